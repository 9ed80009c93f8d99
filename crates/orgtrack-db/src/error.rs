//! Database-specific error types and conversions.

use orgtrack_core::error::OrgtrackError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed row: {0}")]
    InvalidRow(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Missing parent: {entity} with id {id} does not exist")]
    MissingParent { entity: String, id: String },
}

impl From<DbError> for OrgtrackError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrgtrackError::NotFound { entity, id },
            DbError::MissingParent { .. } => OrgtrackError::Constraint {
                message: err.to_string(),
            },
            other => OrgtrackError::Database(other.to_string()),
        }
    }
}
