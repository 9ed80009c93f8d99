//! SurrealDB implementation of [`ProjectRepository`].

use chrono::{DateTime, NaiveDate, Utc};
use orgtrack_core::EntityKind;
use orgtrack_core::error::OrgtrackResult;
use orgtrack_core::models::project::{CreateProject, Project, UpdateProject};
use orgtrack_core::models::status::ProjectStatus;
use orgtrack_core::repository::ProjectRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{ensure_parent, not_found, parse_uuid};
use crate::error::DbError;

/// Calendar dates are stored as `YYYY-MM-DD` strings.
const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DbError::InvalidRow(format!("invalid project due_date {raw:?}: {e}")))
}

fn parse_status(raw: &str) -> Result<ProjectStatus, DbError> {
    raw.parse::<ProjectStatus>()
        .map_err(|e| DbError::InvalidRow(e.to_string()))
}

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    organization_id: String,
    name: String,
    description: String,
    status: String,
    due_date: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, id: Uuid) -> Result<Project, DbError> {
        Ok(Project {
            id,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            name: self.name,
            description: self.description,
            status: parse_status(&self.status)?,
            due_date: self.due_date.as_deref().map(parse_date).transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ProjectRowWithId {
    record_id: String,
    organization_id: String,
    name: String,
    description: String,
    status: String,
    due_date: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRowWithId {
    fn try_into_project(self) -> Result<Project, DbError> {
        let id = parse_uuid("project", &self.record_id)?;
        ProjectRow {
            organization_id: self.organization_id,
            name: self.name,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_project(id)
    }
}

/// SurrealDB implementation of the Project repository.
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealProjectRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, input: CreateProject) -> OrgtrackResult<Project> {
        ensure_parent(&self.db, EntityKind::Organization, input.organization_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 organization_id = $organization_id, \
                 name = $name, description = $description, \
                 status = $status, due_date = $due_date",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("status", input.status.as_str()))
            .bind(("due_date", input.due_date.map(format_date)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Project, &id_str))?;

        Ok(row.into_project(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgtrackResult<Project> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('project', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Project, &id_str))?;

        Ok(row.into_project(id)?)
    }

    async fn get_in_organization(&self, organization_id: Uuid, id: Uuid) -> OrgtrackResult<Project> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('project', $id) \
                 WHERE organization_id = $organization_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Project, &id_str))?;

        Ok(row.into_project(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateProject) -> OrgtrackResult<Project> {
        // UPDATE on a missing record yields no rows; check first so the
        // caller gets a precise NotFound.
        self.get_by_id(id).await?;

        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.due_date.is_some() {
            sets.push("due_date = $due_date");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('project', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(due_date) = input.due_date {
            // Some(None) clears the date.
            builder = builder.bind(("due_date", due_date.map(format_date)));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(EntityKind::Project, &id_str))?;

        Ok(row.into_project(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgtrackResult<()> {
        self.db
            .query("DELETE type::record('project', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> OrgtrackResult<Vec<Project>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM project \
                 WHERE organization_id = $organization_id \
                 ORDER BY created_at ASC, record_id ASC",
            )
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_project())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
