//! Named binary blob storage.
//!
//! # Responsibility
//! - Provide get/set of a named blob for collection snapshots.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `set` fully replaces the previous value of a key.
//! - `get` of a never-written key returns `Ok(None)`.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Key-value backend the store persists its slots through.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()>;
}

/// SQLite-backed key-value store. Owns its connection.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) the slot database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory slot database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Closes the underlying SQLite handle.
    pub fn close(self) -> Result<(), DbError> {
        self.conn
            .close()
            .map_err(|(_, err)| DbError::Sqlite(err))
    }

    /// Borrowed connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    slots: HashMap<String, Vec<u8>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        self.slots.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> RepoResult<()> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};

    #[test]
    fn sqlite_get_missing_key_returns_none() {
        let kv = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(kv.get("sportItems").unwrap(), None);
    }

    #[test]
    fn sqlite_set_replaces_previous_value() {
        let mut kv = SqliteKeyValueStore::open_in_memory().unwrap();
        kv.set("packingLists", b"[]").unwrap();
        kv.set("packingLists", b"[1]").unwrap();
        assert_eq!(kv.get("packingLists").unwrap().as_deref(), Some(&b"[1]"[..]));

        let rows: i64 = kv
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        kv.close().unwrap();
    }

    #[test]
    fn memory_store_keeps_slots_independent() {
        let mut kv = MemoryKeyValueStore::new();
        assert!(kv.is_empty());
        kv.set("a", b"1").unwrap();
        kv.set("b", b"2").unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.get("a").unwrap(), Some(b"1".to_vec()));
    }
}
