//! orgtrack core: the organization → project → task → comment entity
//! model, the domain error type, and the record-store traits every
//! storage backend implements.

pub mod entity;
pub mod error;
pub mod models;
pub mod repository;

pub use entity::EntityKind;
pub use error::{OrgtrackError, OrgtrackResult};
