//! Input validation errors.

use orgtrack_core::EntityKind;
use orgtrack_core::error::OrgtrackError;
use orgtrack_core::models::status::ParseStatusError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("malformed {entity} id: {raw:?}")]
    MalformedId { entity: EntityKind, raw: String },

    #[error(transparent)]
    Status(#[from] ParseStatusError),

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} is not a valid e-mail address: {value:?}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("{field} is not a valid {expected}: {value:?}")]
    InvalidDate {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{entity} {id} does not belong to organization {slug:?}")]
    ScopeMismatch {
        entity: EntityKind,
        id: Uuid,
        slug: String,
    },
}

impl From<InputError> for OrgtrackError {
    fn from(err: InputError) -> Self {
        OrgtrackError::Validation {
            message: err.to_string(),
        }
    }
}
