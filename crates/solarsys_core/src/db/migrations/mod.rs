//! Ordered schema migrations.
//!
//! # Invariants
//! - Script versions are contiguous and start at 1.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - All pending scripts commit together or not at all.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs in application order.
const SCRIPTS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Returns the newest schema version this build can produce.
pub fn latest_version() -> u32 {
    SCRIPTS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the database schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this build;
///   the database is left untouched.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending: Vec<_> = SCRIPTS
        .iter()
        .filter(|(version, _)| *version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &(version, script) in pending {
        let step = format!("{script}\nPRAGMA user_version = {version};");
        tx.execute_batch(&step)
            .map_err(|source| DbError::Migration { version, source })?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    Ok(())
}
