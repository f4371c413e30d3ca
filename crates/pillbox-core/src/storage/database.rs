//! Key-value backends for the medication slot.
//!
//! - [`SqliteKv`]: a `kv` table in a SQLite file under the data directory
//! - [`MemoryKv`]: an in-process map, nothing survives the process

use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{DatabaseError, Result};

/// A string store addressed by named slots.
pub trait KvBackend {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's contents.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed slot store.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    /// Open (creating if needed) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened kv database");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KvBackend for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Map-backed slot store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    slots: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_kv_store() {
        let mut db = SqliteKv::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn sqlite_kv_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pillbox.db");
        {
            let mut db = SqliteKv::open(&path).unwrap();
            db.set("medications", "[]").unwrap();
        }
        let db = SqliteKv::open(&path).unwrap();
        assert_eq!(db.get("medications").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn sqlite_kv_open_fails_on_directory_path() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(SqliteKv::open(dir.path()).is_err());
    }

    #[test]
    fn memory_kv_store() {
        let mut kv = MemoryKv::new();
        assert!(kv.get("a").unwrap().is_none());
        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
    }
}
