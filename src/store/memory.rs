use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::app::Result;
use crate::store::Store;

/// Process-local store. Values are kept as JSON text so decoding behaves as it
/// does for the SQLite backend.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key` without validating it.
    pub async fn set_raw(&self, key: &str, text: impl Into<String>) {
        self.documents
            .write()
            .await
            .insert(key.to_string(), text.into());
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let documents = self.documents.read().await;
        match documents.get(key) {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, document: &Value) -> Result<()> {
        let text = serde_json::to_string(document)?;
        self.documents.write().await.insert(key.to_string(), text);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.documents.write().await.remove(key);
        Ok(())
    }

    async fn insert_if_absent(&self, key: &str, document: &Value) -> Result<bool> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(key) {
            return Ok(false);
        }
        documents.insert(key.to_string(), serde_json::to_string(document)?);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_and_clear() {
        let store = MemoryStore::new();
        store.set("favorite-videos", &json!([{"id": "a"}])).await.unwrap();
        assert_eq!(
            store.get("favorite-videos").await.unwrap(),
            Some(json!([{"id": "a"}]))
        );

        store.clear("favorite-videos").await.unwrap();
        assert!(store.get("favorite-videos").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_raw_garbage_fails_to_decode() {
        let store = MemoryStore::new();
        store.set_raw("watch-history", "[{\"id\":").await;
        assert!(store.get("watch-history").await.unwrap_err().is_storage());
    }

    #[tokio::test]
    async fn test_insert_if_absent() {
        let store = MemoryStore::new();
        assert!(store.insert_if_absent("k", &json!(1)).await.unwrap());
        assert!(!store.insert_if_absent("k", &json!(2)).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some(json!(1)));
    }
}
