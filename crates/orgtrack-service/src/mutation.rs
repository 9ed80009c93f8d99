//! Mutation engine: create and patch projects, tasks and comments.
//!
//! Every operation parses and validates its whole input first, then
//! resolves scope, then performs exactly one store write. A failure at
//! any step leaves the store untouched.

use orgtrack_core::EntityKind;
use orgtrack_core::error::OrgtrackResult;
use orgtrack_core::models::comment::{Comment, CreateComment};
use orgtrack_core::models::project::{CreateProject, Project, UpdateProject};
use orgtrack_core::models::task::{CreateTask, Task, UpdateTask};
use orgtrack_core::repository::{CommentRepository, ProjectRepository, Store, TaskRepository};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::InputError;
use crate::input::{self as parse, double_option};
use crate::scope::ScopeResolver;

// ---------------------------------------------------------------------------
// Wire inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProjectInput {
    pub organization_slug: String,
    pub name: String,
    /// Defaults to empty.
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `ACTIVE`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectInput {
    pub project_id: String,
    /// When present the project must belong to this organization.
    #[serde(default)]
    pub organization_slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` and `Some(Some(""))` both clear the description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    /// `Some(None)` clears the due date.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskInput {
    pub project_id: String,
    pub organization_slug: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_email: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskInput {
    pub task_id: String,
    #[serde(default)]
    pub organization_slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    /// `Some(None)` or an empty string unassigns the task.
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskStatusInput {
    pub task_id: String,
    #[serde(default)]
    pub organization_slug: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskCommentInput {
    pub task_id: String,
    #[serde(default)]
    pub organization_slug: Option<String>,
    pub content: String,
    pub author_email: String,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct MutationEngine<S: Store> {
    store: S,
    scope: ScopeResolver<S>,
    config: ServiceConfig,
}

impl<S: Store> MutationEngine<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            scope: ScopeResolver::new(store.clone()),
            store,
            config,
        }
    }

    pub async fn create_project(&self, input: CreateProjectInput) -> OrgtrackResult<Project> {
        let name = parse::bounded("name", &input.name, self.config.max_name_length)?;
        let status = match input.status.as_deref() {
            Some(raw) => parse::project_status(raw)?,
            None => Default::default(),
        };
        let due_date = input
            .due_date
            .as_deref()
            .map(|raw| parse::date("due_date", raw))
            .transpose()?;

        let organization = self
            .scope
            .resolve_organization(&input.organization_slug)
            .await?;

        let project = self
            .store
            .projects()
            .create(CreateProject {
                organization_id: organization.id,
                name,
                description: input.description.unwrap_or_default(),
                status,
                due_date,
            })
            .await?;

        info!(
            project_id = %project.id,
            slug = %organization.slug,
            "Project created"
        );
        Ok(project)
    }

    pub async fn update_project(&self, input: UpdateProjectInput) -> OrgtrackResult<Project> {
        let id = parse::parse_id(EntityKind::Project, &input.project_id)?;
        let patch = UpdateProject {
            name: input
                .name
                .as_deref()
                .map(|raw| parse::bounded("name", raw, self.config.max_name_length))
                .transpose()?,
            description: input.description.map(Option::unwrap_or_default),
            status: input
                .status
                .as_deref()
                .map(parse::project_status)
                .transpose()?,
            due_date: input
                .due_date
                .map(|slot| slot.as_deref().map(|raw| parse::date("due_date", raw)).transpose())
                .transpose()?,
        };

        match input.organization_slug.as_deref() {
            Some(slug) => {
                self.scope.resolve_project(slug, &input.project_id).await?;
            }
            None if self.config.require_update_scope => {
                return Err(InputError::MissingField {
                    field: "organization_slug",
                }
                .into());
            }
            None => {}
        }

        let project = self.store.projects().update(id, patch).await?;
        info!(project_id = %project.id, "Project updated");
        Ok(project)
    }

    pub async fn create_task(&self, input: CreateTaskInput) -> OrgtrackResult<Task> {
        let project_id = parse::parse_id(EntityKind::Project, &input.project_id)?;
        let title = parse::bounded("title", &input.title, self.config.max_name_length)?;
        let status = parse::task_status(parse::require("status", &input.status)?)?;
        let assignee_email = parse::optional_email(
            "assignee_email",
            input.assignee_email.as_deref().unwrap_or_default(),
        )?;
        let due_date = input
            .due_date
            .as_deref()
            .map(|raw| parse::date_time("due_date", raw))
            .transpose()?;

        let organization = self
            .scope
            .resolve_organization(&input.organization_slug)
            .await?;
        let project = self.store.projects().get_by_id(project_id).await?;
        if project.organization_id != organization.id {
            warn!(
                project_id = %project_id,
                slug = %organization.slug,
                "Task creation rejected: project outside organization"
            );
            return Err(InputError::ScopeMismatch {
                entity: EntityKind::Project,
                id: project_id,
                slug: organization.slug,
            }
            .into());
        }

        let task = self
            .store
            .tasks()
            .create(CreateTask {
                project_id,
                title,
                description: input.description.unwrap_or_default(),
                status,
                assignee_email,
                due_date,
            })
            .await?;

        info!(
            task_id = %task.id,
            project_id = %project_id,
            slug = %organization.slug,
            "Task created"
        );
        Ok(task)
    }

    pub async fn update_task(&self, input: UpdateTaskInput) -> OrgtrackResult<Task> {
        let id = parse::parse_id(EntityKind::Task, &input.task_id)?;
        let patch = UpdateTask {
            title: input
                .title
                .as_deref()
                .map(|raw| parse::bounded("title", raw, self.config.max_name_length))
                .transpose()?,
            description: input.description.map(Option::unwrap_or_default),
            status: input
                .status
                .as_deref()
                .map(parse::task_status)
                .transpose()?,
            assignee_email: input
                .assignee_email
                .map(|slot| {
                    parse::optional_email("assignee_email", slot.as_deref().unwrap_or_default())
                })
                .transpose()?,
            due_date: input
                .due_date
                .map(|slot| {
                    slot.as_deref()
                        .map(|raw| parse::date_time("due_date", raw))
                        .transpose()
                })
                .transpose()?,
        };

        self.task_write_scope(&input.task_id, input.organization_slug.as_deref())
            .await?;

        let task = self.store.tasks().update(id, patch).await?;
        info!(task_id = %task.id, "Task updated");
        Ok(task)
    }

    /// Shorthand for an [`update_task`](Self::update_task) that only
    /// moves the task between statuses.
    pub async fn update_task_status(&self, input: UpdateTaskStatusInput) -> OrgtrackResult<Task> {
        let id = parse::parse_id(EntityKind::Task, &input.task_id)?;
        let status = parse::task_status(parse::require("status", &input.status)?)?;

        self.task_write_scope(&input.task_id, input.organization_slug.as_deref())
            .await?;

        let task = self
            .store
            .tasks()
            .update(
                id,
                UpdateTask {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
        info!(task_id = %task.id, status = %status, "Task status changed");
        Ok(task)
    }

    pub async fn create_task_comment(
        &self,
        input: CreateTaskCommentInput,
    ) -> OrgtrackResult<Comment> {
        let task_id = parse::parse_id(EntityKind::Task, &input.task_id)?;
        let content = parse::require("content", &input.content)?.to_string();
        let author_email = parse::email("author_email", &input.author_email)?;

        match input.organization_slug.as_deref() {
            Some(slug) => {
                self.scope.resolve_task(slug, &input.task_id).await?;
            }
            None => {
                self.store.tasks().get_by_id(task_id).await?;
            }
        }

        let comment = self
            .store
            .comments()
            .create(CreateComment {
                task_id,
                content,
                author_email,
            })
            .await?;

        info!(comment_id = %comment.id, task_id = %task_id, "Comment created");
        Ok(comment)
    }

    /// Scope check shared by task patches. Without a slug the legacy
    /// unscoped path applies unless the config demands one.
    async fn task_write_scope(&self, raw_id: &str, slug: Option<&str>) -> OrgtrackResult<()> {
        match slug {
            Some(slug) => {
                self.scope.resolve_task(slug, raw_id).await?;
            }
            None if self.config.require_update_scope => {
                return Err(InputError::MissingField {
                    field: "organization_slug",
                }
                .into());
            }
            None => {}
        }
        Ok(())
    }
}
