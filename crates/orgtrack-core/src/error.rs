//! Error types for orgtrack.

use thiserror::Error;

use crate::entity::EntityKind;

#[derive(Debug, Error)]
pub enum OrgtrackError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl OrgtrackError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        OrgtrackError::NotFound {
            entity: kind.label().into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        OrgtrackError::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OrgtrackError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, OrgtrackError::Validation { .. })
    }
}

pub type OrgtrackResult<T> = Result<T, OrgtrackError>;
