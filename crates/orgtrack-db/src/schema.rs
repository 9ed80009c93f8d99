//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings. Statuses are stored as their wire strings with ASSERT
//! constraints limiting them to the closed sets. Parent links are plain
//! id strings; cascade delete is implemented with table events.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (tenant root)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD slug ON TABLE organization TYPE string;
DEFINE FIELD contact_email ON TABLE organization TYPE string;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_slug ON TABLE organization \
    COLUMNS slug UNIQUE;

-- =======================================================================
-- Projects (organization scope)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE project TYPE string;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE string DEFAULT '';
DEFINE FIELD status ON TABLE project TYPE string \
    ASSERT $value IN ['ACTIVE', 'COMPLETED', 'ON_HOLD'];
DEFINE FIELD due_date ON TABLE project TYPE option<string>;
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_org ON TABLE project \
    COLUMNS organization_id;

-- =======================================================================
-- Tasks (project scope)
-- =======================================================================
DEFINE TABLE task SCHEMAFULL;
DEFINE FIELD project_id ON TABLE task TYPE string;
DEFINE FIELD title ON TABLE task TYPE string;
DEFINE FIELD description ON TABLE task TYPE string DEFAULT '';
DEFINE FIELD status ON TABLE task TYPE string \
    ASSERT $value IN ['TODO', 'IN_PROGRESS', 'DONE'];
DEFINE FIELD assignee_email ON TABLE task TYPE string DEFAULT '';
DEFINE FIELD due_date ON TABLE task TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE task TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE task TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_task_project ON TABLE task \
    COLUMNS project_id;
DEFINE INDEX idx_task_project_status ON TABLE task \
    COLUMNS project_id, status;

-- =======================================================================
-- Comments (task scope, append-only)
-- =======================================================================
DEFINE TABLE comment SCHEMAFULL;
DEFINE FIELD task_id ON TABLE comment TYPE string;
DEFINE FIELD content ON TABLE comment TYPE string;
DEFINE FIELD author_email ON TABLE comment TYPE string;
DEFINE FIELD created_at ON TABLE comment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_comment_task_time ON TABLE comment \
    COLUMNS task_id, created_at;

-- =======================================================================
-- Cascade delete (parent -> children)
-- =======================================================================
DEFINE EVENT organization_cascade ON TABLE organization \
    WHEN $event = 'DELETE' THEN { \
        DELETE project WHERE organization_id = meta::id($before.id); \
    };
DEFINE EVENT project_cascade ON TABLE project \
    WHEN $event = 'DELETE' THEN { \
        DELETE task WHERE project_id = meta::id($before.id); \
    };
DEFINE EVENT task_cascade ON TABLE task \
    WHEN $event = 'DELETE' THEN { \
        DELETE comment WHERE task_id = meta::id($before.id); \
    };
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
