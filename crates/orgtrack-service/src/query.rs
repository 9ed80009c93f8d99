//! Read operations exposed to clients.
//!
//! Collection reads keyed by an organization slug are lenient: an unknown
//! slug yields an empty list. Reads keyed by a project or task id fail
//! with `NotFound` when the id is not inside the named organization.

use orgtrack_core::error::OrgtrackResult;
use orgtrack_core::models::comment::Comment;
use orgtrack_core::models::organization::Organization;
use orgtrack_core::models::project::Project;
use orgtrack_core::models::task::Task;
use orgtrack_core::repository::{
    CommentRepository, OrganizationRepository, ProjectRepository, Store, TaskRepository,
};
use serde::Serialize;

use crate::scope::ScopeResolver;
use crate::stats::{AggregateCalculator, ProjectStats};

/// A project together with its live aggregate fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub stats: ProjectStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<Comment>,
}

/// A project with its tasks, each with its comments.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub stats: ProjectStats,
    pub tasks: Vec<TaskDetail>,
}

pub struct QueryFacade<S: Store> {
    store: S,
    scope: ScopeResolver<S>,
    stats: AggregateCalculator<S>,
}

impl<S: Store> QueryFacade<S> {
    pub fn new(store: S) -> Self {
        Self {
            scope: ScopeResolver::new(store.clone()),
            stats: AggregateCalculator::new(store.clone()),
            store,
        }
    }

    pub async fn list_organizations(&self) -> OrgtrackResult<Vec<Organization>> {
        self.store.organizations().list().await
    }

    /// Projects of an organization with their aggregates. Unknown slug
    /// gives an empty list.
    pub async fn list_projects(&self, organization_slug: &str) -> OrgtrackResult<Vec<ProjectSummary>> {
        let Some(organization) = self.scope.find_organization(organization_slug).await? else {
            return Ok(Vec::new());
        };

        let projects = self
            .store
            .projects()
            .list_by_organization(organization.id)
            .await?;

        let mut summaries = Vec::with_capacity(projects.len());
        for project in projects {
            let stats = self.stats.project_stats(&project).await?;
            summaries.push(ProjectSummary { project, stats });
        }
        Ok(summaries)
    }

    pub async fn list_tasks(
        &self,
        project_id: &str,
        organization_slug: &str,
    ) -> OrgtrackResult<Vec<Task>> {
        let project = self
            .scope
            .resolve_project(organization_slug, project_id)
            .await?;
        self.store.tasks().list_by_project(project.id).await
    }

    /// Comments on a task, oldest first.
    pub async fn list_task_comments(
        &self,
        task_id: &str,
        organization_slug: &str,
    ) -> OrgtrackResult<Vec<Comment>> {
        let task = self.scope.resolve_task(organization_slug, task_id).await?;
        self.store.comments().list_by_task(task.id).await
    }

    /// One project with its aggregates, tasks and comments.
    ///
    /// Aggregates are computed from the same task list that is returned.
    pub async fn project_detail(
        &self,
        organization_slug: &str,
        project_id: &str,
    ) -> OrgtrackResult<ProjectDetail> {
        let project = self
            .scope
            .resolve_project(organization_slug, project_id)
            .await?;
        let tasks = self.store.tasks().list_by_project(project.id).await?;
        let stats = ProjectStats::from_tasks(&tasks);

        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            let comments = self.store.comments().list_by_task(task.id).await?;
            details.push(TaskDetail { task, comments });
        }

        Ok(ProjectDetail {
            project,
            stats,
            tasks: details,
        })
    }
}
