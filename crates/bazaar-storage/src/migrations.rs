//! Database schema migrations.
//!
//! Applies the initial schema: the products table and the
//! schema_migrations tracking table.

use rusqlite::Connection;
use tracing::info;

use bazaar_core::error::BazaarError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental
/// changes.
pub fn run_migrations(conn: &Connection) -> Result<(), BazaarError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| BazaarError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| BazaarError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: products_schema");
    }

    Ok(())
}

/// Version 1: products table.
fn apply_v1(conn: &Connection) -> Result<(), BazaarError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id          TEXT PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            price       TEXT,
            category    TEXT,
            condition   TEXT,
            description TEXT,
            images      TEXT NOT NULL DEFAULT '[]',
            owner       TEXT,
            created_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            updated_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        -- Name lookups are always case-insensitive substring matches.
        CREATE INDEX IF NOT EXISTS idx_products_name
            ON products (name COLLATE NOCASE);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'products_schema');
        ",
    )
    .map_err(|e| BazaarError::Storage(format!("Failed to apply v1 schema: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_products_table_exists_after_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'products'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
