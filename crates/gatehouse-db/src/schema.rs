//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

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
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Accounts (identity provider records)
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD email ON TABLE account TYPE string;
DEFINE FIELD password_hash ON TABLE account TYPE string;
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_email ON TABLE account \
    COLUMNS email UNIQUE;

-- =======================================================================
-- Profiles (one per account; record id mirrors the account id)
-- =======================================================================
DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD user_id ON TABLE profile TYPE string;
DEFINE FIELD full_name ON TABLE profile TYPE string;
DEFINE FIELD phone_number ON TABLE profile TYPE string;
DEFINE FIELD flat_number ON TABLE profile TYPE option<string>;
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_user ON TABLE profile \
    COLUMNS user_id UNIQUE;
DEFINE INDEX idx_profile_flat ON TABLE profile COLUMNS flat_number;

-- =======================================================================
-- Role assignments (principal <-> role, immutable once created)
-- =======================================================================
DEFINE TABLE user_role SCHEMAFULL;
DEFINE FIELD user_id ON TABLE user_role TYPE string;
DEFINE FIELD role ON TABLE user_role TYPE string \
    ASSERT $value IN ['resident', 'guard', 'admin', 'super_admin'];
DEFINE FIELD created_at ON TABLE user_role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_role ON TABLE user_role \
    COLUMNS user_id, role UNIQUE;

-- =======================================================================
-- Bootstrap lock (fixed-id record; the atomic super_admin
-- bootstrap precondition)
-- =======================================================================
DEFINE TABLE bootstrap_lock SCHEMAFULL;
DEFINE FIELD claimed_by ON TABLE bootstrap_lock TYPE string;
DEFINE FIELD created_at ON TABLE bootstrap_lock TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Flat claims (fixed-id records; the record id is the flat number,
-- so claiming an occupied flat fails atomically)
-- =======================================================================
DEFINE TABLE flat_claim SCHEMAFULL;
DEFINE FIELD user_id ON TABLE flat_claim TYPE string;
DEFINE FIELD created_at ON TABLE flat_claim TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Visitors (one record per physical-access request)
-- =======================================================================
DEFINE TABLE visitor SCHEMAFULL;
DEFINE FIELD visitor_name ON TABLE visitor TYPE string;
DEFINE FIELD visitor_phone ON TABLE visitor TYPE string;
DEFINE FIELD purpose ON TABLE visitor TYPE string;
DEFINE FIELD flat_number ON TABLE visitor TYPE string;
DEFINE FIELD resident_id ON TABLE visitor TYPE string;
DEFINE FIELD logged_by ON TABLE visitor TYPE string;
DEFINE FIELD status ON TABLE visitor TYPE string \
    ASSERT $value IN ['pending', 'approved', 'denied'];
DEFINE FIELD expected_at ON TABLE visitor TYPE option<datetime>;
DEFINE FIELD notes ON TABLE visitor TYPE option<string>;
DEFINE FIELD approved_at ON TABLE visitor TYPE option<datetime>;
DEFINE FIELD approved_by ON TABLE visitor TYPE option<string>;
DEFINE FIELD created_at ON TABLE visitor TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_visitor_flat ON TABLE visitor COLUMNS flat_number;
DEFINE INDEX idx_visitor_status ON TABLE visitor COLUMNS status;
DEFINE INDEX idx_visitor_created ON TABLE visitor COLUMNS created_at;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
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

            // Record the applied migration.
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

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
