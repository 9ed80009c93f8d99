//! Domain models for orgtrack.
//!
//! Each entity has a read shape plus `Create*` input, and the mutable
//! ones have an `Update*` patch with one optional slot per field.

pub mod comment;
pub mod organization;
pub mod project;
pub mod status;
pub mod task;
