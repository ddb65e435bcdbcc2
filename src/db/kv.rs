use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by key-value storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Minimal string key-value store, the shape of a browser's local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-process store backed by a HashMap
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed store using the `kv_store` table
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    /// Wrap a connection whose schema has already been initialized
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// List stored keys, oldest write first
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv_store ORDER BY modified_ts, key"
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, modified_ts) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, modified_ts = excluded.modified_ts",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    #[test]
    fn test_memory_kv_set_get_remove() {
        let mut kv = MemoryKv::new();
        assert_eq!(kv.get("a").unwrap(), None);
        kv.set("a", "1").unwrap();
        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("2".to_string()));
        assert_eq!(kv.len(), 1);
        kv.remove("a").unwrap();
        assert!(kv.is_empty());
    }

    #[test]
    fn test_storage_error_sources() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StorageError::from(parse);
        assert!(matches!(err, StorageError::Serialize(_)));
        assert!(err.to_string().starts_with("Failed to serialize snapshot"));

        let err = StorageError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StorageError::Sqlite(_)));
    }

    #[test]
    fn test_sqlite_kv_overwrites() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let mut kv = SqliteKv::new(conn);

        assert_eq!(kv.get("kanbanTasks").unwrap(), None);
        kv.set("kanbanTasks", "[]").unwrap();
        kv.set("kanbanTasks", "[1]").unwrap();
        assert_eq!(kv.get("kanbanTasks").unwrap(), Some("[1]".to_string()));
        assert_eq!(kv.keys().unwrap(), vec!["kanbanTasks".to_string()]);

        kv.remove("kanbanTasks").unwrap();
        assert_eq!(kv.get("kanbanTasks").unwrap(), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut kv: Box<dyn KeyValueStore> = Box::new(MemoryKv::new());
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap(), Some("v".to_string()));
    }
}
