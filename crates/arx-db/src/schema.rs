//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Every tenant-scoped table is
//! indexed on `organization_id` — tenant filters are on the hot path
//! of every query.

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
-- Organizations (the tenants)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD slug ON TABLE organization TYPE string;
DEFINE FIELD industry ON TABLE organization TYPE string \
    ASSERT $value IN ['real-estate', 'healthcare', 'legal'];
DEFINE FIELD metadata ON TABLE organization TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_slug ON TABLE organization \
    COLUMNS slug UNIQUE;

-- =======================================================================
-- Customers (tenant-scoped CRM contacts)
-- =======================================================================
DEFINE TABLE customer SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE customer TYPE string;
DEFINE FIELD name ON TABLE customer TYPE string;
DEFINE FIELD email ON TABLE customer TYPE string;
DEFINE FIELD phone ON TABLE customer TYPE option<string>;
DEFINE FIELD status ON TABLE customer TYPE string \
    ASSERT $value IN ['Lead', 'Active', 'Archived'];
DEFINE FIELD metadata ON TABLE customer TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_customer_org ON TABLE customer \
    COLUMNS organization_id;
DEFINE INDEX idx_customer_org_email ON TABLE customer \
    COLUMNS organization_id, email UNIQUE;

-- =======================================================================
-- Listings (tenant-scoped property listings)
-- =======================================================================
DEFINE TABLE listing SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE listing TYPE string;
DEFINE FIELD title ON TABLE listing TYPE string;
DEFINE FIELD address ON TABLE listing TYPE string;
DEFINE FIELD price_cents ON TABLE listing TYPE int;
DEFINE FIELD status ON TABLE listing TYPE string \
    ASSERT $value IN ['Draft', 'Published', 'Sold', 'Withdrawn'];
DEFINE FIELD metadata ON TABLE listing TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_listing_org ON TABLE listing \
    COLUMNS organization_id;

-- =======================================================================
-- Audit log (tenant scope, append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD tenant_id ON TABLE audit_log TYPE string;
DEFINE FIELD actor_id ON TABLE audit_log TYPE string;
DEFINE FIELD action ON TABLE audit_log TYPE string;
DEFINE FIELD target_type ON TABLE audit_log TYPE string;
DEFINE FIELD target_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD outcome ON TABLE audit_log TYPE string \
    ASSERT $value IN ['Success', 'Denied'];
DEFINE FIELD metadata ON TABLE audit_log TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD timestamp ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_tenant_time ON TABLE audit_log \
    COLUMNS tenant_id, timestamp;
DEFINE INDEX idx_audit_tenant_action ON TABLE audit_log \
    COLUMNS tenant_id, action;
";

/// Apply all pending migrations, tracking versions in `_migration`.
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
            db.query("CREATE _migration SET version = $version, name = $name")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_defines_every_table() {
        for table in ["organization", "customer", "listing", "audit_log"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
                "missing table definition: {table}"
            );
        }
    }

    #[test]
    fn audit_log_is_append_only() {
        assert!(SCHEMA_V1.contains("FOR update NONE"));
        assert!(SCHEMA_V1.contains("FOR delete NONE"));
    }
}
