use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use serde_json::Value;

use crate::app::{PaperbitesError, Result};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| PaperbitesError::Storage(format!("Migration failed: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| PaperbitesError::Storage(format!("Connection lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?
        };

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, document: &Value) -> Result<()> {
        let text = serde_json::to_string(document)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM documents WHERE key = ?1", params![key])?;
        Ok(())
    }

    async fn insert_if_absent(&self, key: &str, document: &Value) -> Result<bool> {
        let text = serde_json::to_string(document)?;
        let conn = self.lock()?;

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, text, Utc::now().to_rfc3339()],
        )?;

        Ok(inserted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get("watch-history").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .set("recent-searches", &json!(["graphs", "proteins"]))
            .await
            .unwrap();

        let doc = store.get("recent-searches").await.unwrap().unwrap();
        assert_eq!(doc, json!(["graphs", "proteins"]));
    }

    #[tokio::test]
    async fn test_set_overwrites_whole_document() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("k", &json!({"a": 1, "b": 2})).await.unwrap();
        store.set("k", &json!({"a": 3})).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().unwrap(), json!({"a": 3}));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("k", &json!([1])).await.unwrap();
        store.clear("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());

        // Clearing a missing key is not an error
        store.clear("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_existing() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.insert_if_absent("k", &json!([])).await.unwrap());

        store.set("k", &json!(["kept"])).await.unwrap();
        assert!(!store.insert_if_absent("k", &json!([])).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().unwrap(), json!(["kept"]));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_error() {
        let store = SqliteStore::in_memory().unwrap();
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "INSERT INTO documents (key, value, updated_at) VALUES ('k', '{not json', '')",
                [],
            )
            .unwrap();
        }

        let err = store.get("k").await.unwrap_err();
        assert!(err.is_storage());
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paperbites.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.set("app-settings", &json!({"darkMode": true})).await.unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let doc = store.get("app-settings").await.unwrap().unwrap();
        assert_eq!(doc["darkMode"], true);
    }
}
