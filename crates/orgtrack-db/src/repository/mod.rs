//! SurrealDB repository implementations.

mod comment;
mod organization;
mod project;
mod task;

pub use comment::SurrealCommentRepository;
pub use organization::SurrealOrganizationRepository;
pub use project::SurrealProjectRepository;
pub use task::SurrealTaskRepository;

use orgtrack_core::EntityKind;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct IdRow {
    #[allow(dead_code)]
    record_id: String,
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::InvalidRow(format!("invalid {field} UUID: {e}")))
}

fn not_found(kind: EntityKind, id: impl ToString) -> DbError {
    DbError::NotFound {
        entity: kind.label().into(),
        id: id.to_string(),
    }
}

/// Fail with [`DbError::MissingParent`] unless the record exists.
///
/// Parent links are stored as plain strings, so the store checks them
/// before writing a child.
async fn ensure_parent<C: Connection>(
    db: &Surreal<C>,
    kind: EntityKind,
    id: Uuid,
) -> Result<(), DbError> {
    let mut result = db
        .query("SELECT meta::id(id) AS record_id FROM type::record($table, $id)")
        .bind(("table", kind.table()))
        .bind(("id", id.to_string()))
        .await?;

    let rows: Vec<IdRow> = result.take(0)?;
    if rows.is_empty() {
        return Err(DbError::MissingParent {
            entity: kind.label().into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
