use rusqlite::Connection;
use sportgear_core::db::migrations::latest_version;
use sportgear_core::db::{open_db, open_db_in_memory, DbError};
use sportgear_core::{open_sqlite_store, KeyValueStore, SqliteKeyValueStore, ITEMS_SLOT};

#[test]
fn fresh_database_is_migrated_to_latest_with_empty_slot_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(slot_count(&conn), 0);
}

#[test]
fn slot_written_before_reopen_survives_migration_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.sqlite3");

    let mut backend = SqliteKeyValueStore::open(&path).unwrap();
    backend.set(ITEMS_SLOT, b"[]").unwrap();
    backend.set(ITEMS_SLOT, br#"[{"name":"kept"}]"#).unwrap();
    backend.close().unwrap();

    let reopened = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(user_version(reopened.connection()), latest_version());
    assert_eq!(slot_count(reopened.connection()), 1);
    assert_eq!(
        reopened.get(ITEMS_SLOT).unwrap().as_deref(),
        Some(&br#"[{"name":"kept"}]"#[..])
    );
    assert!(reopened.get("unknownSlot").unwrap().is_none());
}

#[test]
fn raw_open_leaves_existing_rows_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2);",
            rusqlite::params!["packingLists", b"[]".to_vec()],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(slot_count(&second), 1);
}

#[test]
fn newer_schema_version_is_rejected_by_store_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = match open_sqlite_store(&path) {
        Ok(_) => panic!("store opened over an unsupported schema"),
        Err(err) => err,
    };
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

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn slot_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap()
}
