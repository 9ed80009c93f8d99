//! Tenant scope resolution.
//!
//! A resolved entity is always a descendant of the organization named by
//! the slug. A record that exists under another organization resolves to
//! `NotFound`, exactly as if it did not exist.

use orgtrack_core::EntityKind;
use orgtrack_core::error::{OrgtrackError, OrgtrackResult};
use orgtrack_core::models::organization::Organization;
use orgtrack_core::models::project::Project;
use orgtrack_core::models::task::Task;
use orgtrack_core::repository::{OrganizationRepository, ProjectRepository, Store, TaskRepository};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::input;

/// Resolves organization → project → task chains for a slug.
#[derive(Clone)]
pub struct ScopeResolver<S: Store> {
    store: S,
}

impl<S: Store> ScopeResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The organization with this slug, or `NotFound`.
    pub async fn resolve_organization(&self, slug: &str) -> OrgtrackResult<Organization> {
        let slug = input::require("organization_slug", slug)?;
        let organization = self.store.organizations().get_by_slug(slug).await?;
        debug!(slug, organization_id = %organization.id, "Resolved organization scope");
        Ok(organization)
    }

    /// Lenient variant for collection reads: an unknown slug is `None`
    /// rather than an error. A blank slug is still rejected.
    pub async fn find_organization(&self, slug: &str) -> OrgtrackResult<Option<Organization>> {
        match self.resolve_organization(slug).await {
            Ok(organization) => Ok(Some(organization)),
            Err(OrgtrackError::NotFound { .. }) => {
                debug!(slug, "Unknown organization slug");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The project with this id inside the organization, or `NotFound`.
    pub async fn resolve_project(&self, slug: &str, project_id: &str) -> OrgtrackResult<Project> {
        let id = input::parse_id(EntityKind::Project, project_id)?;
        let organization = self.resolve_organization(slug).await?;
        self.project_in(&organization, id).await
    }

    /// The task with this id, reached through its project, inside the
    /// organization, or `NotFound`.
    pub async fn resolve_task(&self, slug: &str, task_id: &str) -> OrgtrackResult<Task> {
        let id = input::parse_id(EntityKind::Task, task_id)?;
        let organization = self.resolve_organization(slug).await?;
        let task = self.store.tasks().get_by_id(id).await?;

        match self
            .store
            .projects()
            .get_in_organization(organization.id, task.project_id)
            .await
        {
            Ok(_) => Ok(task),
            Err(OrgtrackError::NotFound { .. }) => {
                warn!(
                    slug,
                    task_id = %id,
                    "Task lookup rejected: outside organization scope"
                );
                Err(OrgtrackError::not_found(EntityKind::Task, id))
            }
            Err(e) => Err(e),
        }
    }

    async fn project_in(&self, organization: &Organization, id: Uuid) -> OrgtrackResult<Project> {
        let result = self
            .store
            .projects()
            .get_in_organization(organization.id, id)
            .await;
        if let Err(OrgtrackError::NotFound { .. }) = &result {
            debug!(
                slug = %organization.slug,
                project_id = %id,
                "Project not found in organization scope"
            );
        }
        result
    }
}
