//! SurrealDB implementation of [`TaskRepository`].

use chrono::{DateTime, Utc};
use orgtrack_core::EntityKind;
use orgtrack_core::error::OrgtrackResult;
use orgtrack_core::models::status::TaskStatus;
use orgtrack_core::models::task::{CreateTask, Task, TaskTally, UpdateTask};
use orgtrack_core::repository::TaskRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{ensure_parent, not_found, parse_uuid};
use crate::error::DbError;

/// Both counts of [`TaskTally`] from one grouped statement.
#[derive(Debug, SurrealValue)]
struct TallyRow {
    total: u64,
    done: u64,
}

fn parse_status(raw: &str) -> Result<TaskStatus, DbError> {
    raw.parse::<TaskStatus>()
        .map_err(|e| DbError::InvalidRow(e.to_string()))
}

#[derive(Debug, SurrealValue)]
struct TaskRow {
    project_id: String,
    title: String,
    description: String,
    status: String,
    assignee_email: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self, id: Uuid) -> Result<Task, DbError> {
        Ok(Task {
            id,
            project_id: parse_uuid("project", &self.project_id)?,
            title: self.title,
            description: self.description,
            status: parse_status(&self.status)?,
            assignee_email: self.assignee_email,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct TaskRowWithId {
    record_id: String,
    project_id: String,
    title: String,
    description: String,
    status: String,
    assignee_email: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRowWithId {
    fn try_into_task(self) -> Result<Task, DbError> {
        let id = parse_uuid("task", &self.record_id)?;
        Ok(Task {
            id,
            project_id: parse_uuid("project", &self.project_id)?,
            title: self.title,
            description: self.description,
            status: parse_status(&self.status)?,
            assignee_email: self.assignee_email,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Task repository.
pub struct SurrealTaskRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealTaskRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TaskRepository for SurrealTaskRepository<C> {
    async fn create(&self, input: CreateTask) -> OrgtrackResult<Task> {
        ensure_parent(&self.db, EntityKind::Project, input.project_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('task', $id) SET \
                 project_id = $project_id, \
                 title = $title, description = $description, \
                 status = $status, assignee_email = $assignee_email, \
                 due_date = $due_date",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("status", input.status.as_str()))
            .bind(("assignee_email", input.assignee_email))
            .bind(("due_date", input.due_date))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Task, &id_str))?;

        Ok(row.into_task(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgtrackResult<Task> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('task', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Task, &id_str))?;

        Ok(row.into_task(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> OrgtrackResult<Task> {
        self.get_by_id(id).await?;

        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.assignee_email.is_some() {
            sets.push("assignee_email = $assignee_email");
        }
        if input.due_date.is_some() {
            sets.push("due_date = $due_date");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('task', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(assignee_email) = input.assignee_email {
            builder = builder.bind(("assignee_email", assignee_email));
        }
        if let Some(due_date) = input.due_date {
            builder = builder.bind(("due_date", due_date));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Task, &id_str))?;

        Ok(row.into_task(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgtrackResult<()> {
        self.db
            .query("DELETE type::record('task', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_project(&self, project_id: Uuid) -> OrgtrackResult<Vec<Task>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM task \
                 WHERE project_id = $project_id \
                 ORDER BY created_at ASC, record_id ASC",
            )
            .bind(("project_id", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_task())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn tally_by_project(&self, project_id: Uuid) -> OrgtrackResult<TaskTally> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total, count(status = $done) AS done \
                 FROM task WHERE project_id = $project_id GROUP ALL",
            )
            .bind(("project_id", project_id.to_string()))
            .bind(("done", TaskStatus::Done.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TallyRow> = result.take(0).map_err(DbError::from)?;
        // No matching tasks gives no row at all.
        Ok(rows
            .first()
            .map(|r| TaskTally {
                total: r.total,
                done: r.done,
            })
            .unwrap_or_default())
    }
}
