//! Database schema versioning for enrollbook.
//!
//! There is no incremental migration path. When the stored schema version
//! is older than [`CURRENT_VERSION`] the registration tables are dropped and
//! recreated, losing every stored registration. A database stamped by a newer
//! build is refused and left untouched.

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::schema::{DROP_STATEMENTS, SCHEMA_STATEMENTS};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// Creates all tables if they don't exist. A fresh database is stamped with
/// the current version; a database stamped with an older version is rebuilt
/// through [`migrate`].
///
/// # Errors
///
/// Returns [`Error::SchemaCreate`] if a DDL statement fails,
/// [`Error::DatabaseMigration`] if the database is newer than this build, or
/// an error from the rebuild.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_tables(conn)?;
    reconcile_version(conn, CURRENT_VERSION)
}

fn reconcile_version(conn: &Connection, supported: i32) -> Result<()> {
    match get_schema_version(conn)? {
        0 => set_schema_version(conn, supported),
        stored if stored == supported => Ok(()),
        stored if stored > supported => Err(Error::DatabaseMigration {
            message: format!(
                "database schema v{stored} is newer than supported v{supported}"
            ),
        }),
        stored => migrate(conn, stored, supported),
    }
}

/// Drop the registration tables and recreate them at `new_version`.
///
/// Runs in a single transaction: either the rebuild completes or the
/// database is left as it was.
///
/// # Errors
///
/// Returns an error if `new_version` is not positive or any statement fails.
pub fn migrate(conn: &Connection, old_version: i32, new_version: i32) -> Result<()> {
    if new_version < 1 {
        return Err(Error::DatabaseMigration {
            message: format!("invalid target schema version: {new_version}"),
        });
    }

    warn!(
        "Rebuilding registration tables (schema v{} -> v{}); stored registrations are discarded",
        old_version, new_version
    );

    let tx = conn.unchecked_transaction()?;
    for statement in DROP_STATEMENTS {
        tx.execute(statement, [])?;
    }
    create_tables(&tx)?;
    set_schema_version(&tx, new_version)?;
    tx.commit()?;

    debug!("Schema now at version {}", new_version);
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])
            .map_err(|source| Error::SchemaCreate { source })?;
    }
    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
///
/// # Errors
///
/// Returns an error if the metadata table cannot be read or holds a value
/// that is not a number.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
