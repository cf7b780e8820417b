//! SQLite-backed counter store.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{CounterStore, StoreError};

/// Counters persisted in a local SQLite file.
pub struct SqliteCounterStore {
    conn: Mutex<Connection>,
}

impl SqliteCounterStore {
    /// Open (or create) the database file and its table.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS usage_counters (
                name TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))?;
        f(&conn).map_err(|e| StoreError::Database(e.to_string()))
    }
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO usage_counters (name, value) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET value = value + excluded.value
                 RETURNING value",
                params![key, delta],
                |row| row.get(0),
            )
        })
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM usage_counters WHERE name = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = SqliteCounterStore::in_memory().unwrap();
        assert_eq!(store.get("total_requests").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_increment_creates_and_accumulates() {
        let store = SqliteCounterStore::in_memory().unwrap();
        assert_eq!(store.increment("files", 2).await.unwrap(), 2);
        assert_eq!(store.increment("files", 3).await.unwrap(), 5);
        assert_eq!(store.get("files").await.unwrap(), Some(5));
        assert_eq!(store.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_counts_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counters.db");

        {
            let store = SqliteCounterStore::new(&path).unwrap();
            store.increment("total_requests", 1).await.unwrap();
            store.increment("total_requests", 1).await.unwrap();
        }

        let store = SqliteCounterStore::new(&path).unwrap();
        assert_eq!(store.get("total_requests").await.unwrap(), Some(2));
    }
}
