use notekeep_core::db::migrations::latest_version;
use notekeep_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "notes");
    assert_index_exists(&conn, "idx_notes_user_id");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notekeep.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    conn_first
        .execute(
            "INSERT INTO notes (uuid, user_id, title, content) VALUES ('x', 'u', 't', 'c');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
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
fn insert_assigns_creation_timestamps() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (uuid, user_id, title, content) VALUES ('x', 'u', 't', 'c');",
        [],
    )
    .unwrap();

    let (created_at, updated_at): (i64, i64) = conn
        .query_row(
            "SELECT created_at, updated_at FROM notes WHERE uuid = 'x';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(created_at > 0);
    assert_eq!(created_at, updated_at);
}

#[test]
fn creation_timestamp_has_millisecond_precision() {
    let conn = open_db_in_memory().unwrap();
    // Stay clear of a second boundary so whole-second values fall outside the window.
    while !(100..900).contains(&(epoch_millis() % 1000)) {
        std::thread::sleep(Duration::from_millis(5));
    }

    let before = epoch_millis();
    conn.execute(
        "INSERT INTO notes (uuid, user_id, title, content) VALUES ('x', 'u', 't', 'c');",
        [],
    )
    .unwrap();
    let after = epoch_millis();

    let created_at: i64 = conn
        .query_row("SELECT created_at FROM notes WHERE uuid = 'x';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(
        (before - 5..=after + 5).contains(&created_at),
        "created_at={created_at} outside [{before}, {after}]"
    );
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
