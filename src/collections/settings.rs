use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::app::Result;
use crate::collections::load_document;
use crate::domain::{Settings, SettingsUpdate};
use crate::store::{Store, SETTINGS_KEY};

/// The persisted [`Settings`] record.
pub struct SettingsStore {
    store: Arc<dyn Store + Send + Sync>,
    current: Mutex<Option<Settings>>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self {
            store,
            current: Mutex::new(None),
        }
    }

    /// The working record, loading it on first access. A failed read is not cached.
    async fn loaded(&self) -> Result<MutexGuard<'_, Option<Settings>>> {
        let mut current = self.current.lock().await;
        if current.is_none() {
            let settings =
                load_document(self.store.as_ref(), SETTINGS_KEY, Settings::default).await?;
            *current = Some(settings);
        }
        Ok(current)
    }

    /// Current settings, or the defaults while the record cannot be read.
    pub async fn get(&self) -> Settings {
        match self.loaded().await {
            Ok(current) => current.unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }

    /// Merge `update` into the current record and persist it.
    ///
    /// Fails without writing when the stored record cannot be read. The merged
    /// record is kept in memory even if the write fails.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings> {
        let mut current = self.loaded().await?;
        let mut settings = current.unwrap_or_default();
        settings.merge(&update);
        *current = Some(settings);

        self.persist(&settings).await?;
        Ok(settings)
    }

    pub async fn reset(&self) -> Result<()> {
        let mut current = self.current.lock().await;
        *current = Some(Settings::default());

        self.persist(&Settings::default()).await?;
        tracing::info!("Settings reset to defaults");
        Ok(())
    }

    async fn persist(&self, settings: &Settings) -> Result<()> {
        let doc = serde_json::to_value(settings)?;
        if let Err(e) = self.store.set(SETTINGS_KEY, &doc).await {
            tracing::warn!("Failed to persist settings: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::test_support::FlakyStore;
    use crate::domain::DownloadQuality;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_first_run_writes_defaults() {
        let store = Arc::new(MemoryStore::new());
        let settings = SettingsStore::new(store.clone());

        assert_eq!(settings.get().await, Settings::default());
        let doc = store.get(SETTINGS_KEY).await.unwrap().unwrap();
        assert_eq!(doc["autoplay"], true);
        assert_eq!(doc["downloadQuality"], "medium");
    }

    #[tokio::test]
    async fn test_update_changes_only_given_field() {
        let settings = SettingsStore::new(Arc::new(MemoryStore::new()));
        let before = settings.get().await;

        settings
            .update(SettingsUpdate {
                dark_mode: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        let after = settings.get().await;
        assert_eq!(
            after,
            Settings {
                dark_mode: true,
                ..before
            }
        );
    }

    #[tokio::test]
    async fn test_existing_document_survives_restart() {
        let store: Arc<dyn Store + Send + Sync> = Arc::new(MemoryStore::new());
        {
            let settings = SettingsStore::new(store.clone());
            settings
                .update(SettingsUpdate {
                    download_quality: Some(DownloadQuality::High),
                    autoplay: Some(false),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let settings = SettingsStore::new(store).get().await;
        assert_eq!(settings.download_quality, DownloadQuality::High);
        assert!(!settings.autoplay);
    }

    #[tokio::test]
    async fn test_corrupt_document_yields_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set(SETTINGS_KEY, &json!(["not", "settings"])).await.unwrap();

        let settings = SettingsStore::new(store);
        assert_eq!(settings.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_reset() {
        let settings = SettingsStore::new(Arc::new(MemoryStore::new()));
        settings
            .update(SettingsUpdate {
                push_notifications: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        settings.reset().await.unwrap();
        assert_eq!(settings.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_update_after_failed_read_keeps_stored_record() {
        let store = Arc::new(FlakyStore::default());
        store
            .inner
            .set(SETTINGS_KEY, &json!({"autoplay": false, "downloadQuality": "high"}))
            .await
            .unwrap();
        store.fail_reads(1);

        let settings = SettingsStore::new(store.clone());
        let err = settings
            .update(SettingsUpdate {
                dark_mode: Some(true),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.writes(), 0);

        let updated = settings
            .update(SettingsUpdate {
                dark_mode: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!updated.autoplay);
        assert!(updated.dark_mode);
        assert_eq!(updated.download_quality, DownloadQuality::High);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_merged_record() {
        let settings = SettingsStore::new(Arc::new(FlakyStore::failing()));
        let err = settings
            .update(SettingsUpdate {
                dark_mode: Some(true),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(err.is_storage());
        assert!(settings.get().await.dark_mode);
    }
}
