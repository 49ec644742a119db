//! Durable key-value storage for session state.
//!
//! The session core persists exactly three string slots (`token`, `username`,
//! `role`) and needs nothing more than a string-keyed map that survives
//! process restarts. The `KeyValueStore` trait keeps the core independent of
//! the backing medium:
//! - `SqliteKvStore`: on-disk store for the real CLI (WAL mode, single table)
//! - `MemoryKvStore`: HashMap-backed store for tests and embedding

use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

/// A persistent string-keyed store. Last writer wins; no cross-key atomicity.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written or was deleted.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (or overwrite) a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

// ── SQLite-backed store ──────────────────────────────────────────

/// SQLite-backed key-value store.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Open (or create) the store at the given path.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let row = conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match row {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ── In-memory store ──────────────────────────────────────────────

/// HashMap-backed store. Not durable; for tests and short-lived embeddings.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sqlite_store() -> (TempDir, SqliteKvStore) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteKvStore::open(&tmp.path().join("session.db")).unwrap();
        (tmp, store)
    }

    #[test]
    fn sqlite_set_get_roundtrip() {
        let (_tmp, store) = sqlite_store();

        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "abc123").unwrap();
        assert_eq!(store.get("token").unwrap(), Some("abc123".into()));
    }

    #[test]
    fn sqlite_set_overwrites() {
        let (_tmp, store) = sqlite_store();

        store.set("role", "USER").unwrap();
        store.set("role", "ADMIN").unwrap();
        assert_eq!(store.get("role").unwrap(), Some("ADMIN".into()));
    }

    #[test]
    fn sqlite_delete_is_idempotent() {
        let (_tmp, store) = sqlite_store();

        store.set("username", "alice").unwrap();
        store.delete("username").unwrap();
        assert_eq!(store.get("username").unwrap(), None);

        // Deleting an absent key must not error
        store.delete("username").unwrap();
    }

    #[test]
    fn sqlite_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.db");

        {
            let store = SqliteKvStore::open(&path).unwrap();
            store.set("token", "persisted").unwrap();
        }

        let store = SqliteKvStore::open(&path).unwrap();
        assert_eq!(store.get("token").unwrap(), Some("persisted".into()));
    }

    #[test]
    fn memory_store_behaves_like_sqlite() {
        let store = MemoryKvStore::new();

        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "t").unwrap();
        store.set("token", "t2").unwrap();
        assert_eq!(store.get("token").unwrap(), Some("t2".into()));
        store.delete("token").unwrap();
        store.delete("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }
}
