use solarsys_core::db::migrations::latest_version;
use solarsys_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "celestial_bodies");
    assert_table_exists(&conn, "id_sequences");

    let last_value: i64 = conn
        .query_row(
            "SELECT last_value FROM id_sequences WHERE name = 'celestial_bodies';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(last_value, 0);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solarsys.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let sequences: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM id_sequences;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(sequences, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_migration_reports_version_and_keeps_schema_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conflict.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE celestial_bodies (legacy TEXT);")
        .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, .. } => assert_eq!(version, 1),
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
    let sequence_tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'id_sequences';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(sequence_tables, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
