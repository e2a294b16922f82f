//! Schema creation from the typed table definitions.
//!
//! The managed layer tracks its schema version in `PRAGMA user_version`.

use std::path::Path;

use rusqlite::Connection;
use storebench_core::{Category, StoreError, SEED_CATEGORIES};

use crate::query::Insert;
use crate::table::ALL_TABLES;

pub const SCHEMA_VERSION: i32 = 1;

/// Render the DDL for every table.
pub fn schema_sql() -> String {
    ALL_TABLES.iter().map(|t| t.create_sql()).collect()
}

/// Create tables and indexes, seed the sample categories, and stamp the
/// schema version. Runs in one transaction.
pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&schema_sql())?;
    seed_categories(&tx)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Insert the sample categories.
pub fn seed_categories(conn: &Connection) -> Result<(), StoreError> {
    for (name, description) in SEED_CATEGORIES {
        let category = Category {
            id: 0,
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        Insert::record(&category).exec(conn)?;
    }
    Ok(())
}

pub fn user_version(conn: &Connection) -> Result<i32, StoreError> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Open or create a managed-layer database at the given path.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(|e| StoreError::unavailable(path, e))?;
    // First statement to read the file header
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .map_err(|e| StoreError::on_open(path, e))?;
    migrate(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema.
pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    migrate(&conn)?;
    Ok(conn)
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    match user_version(conn)? {
        0 => {
            log::debug!("Creating managed schema (version {})", SCHEMA_VERSION);
            create_schema(conn)
        }
        SCHEMA_VERSION => Ok(()),
        found => Err(StoreError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
    }
}
