// Durable key/value storage for the session strings
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::ClientResult;
use crate::state::DbPool;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> ClientResult<()>;
}

/// SQLite implementation, survives restarts.
pub struct SqliteSessionStore {
    pool: DbPool,
}

impl SqliteSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row(
                "SELECT value FROM client_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO client_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM client_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Process-local store, nothing outlives the value.
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}
