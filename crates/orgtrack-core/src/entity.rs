//! The closed set of entity kinds stored by orgtrack.
//!
//! Each kind maps to exactly one table in the record store. There is no
//! runtime registration: adding a kind means adding a variant here.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Organization,
    Project,
    Task,
    Comment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Organization,
        EntityKind::Project,
        EntityKind::Task,
        EntityKind::Comment,
    ];

    /// Table holding records of this kind.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Organization => "organization",
            EntityKind::Project => "project",
            EntityKind::Task => "task",
            EntityKind::Comment => "comment",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        self.table()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
