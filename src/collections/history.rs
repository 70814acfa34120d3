use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::app::Result;
use crate::collections::{dedup_by_key, DocumentList};
use crate::domain::{HistoryEntry, VideoArtifact};
use crate::store::{Store, HISTORY_KEY};

pub const HISTORY_LIMIT: usize = 50;

/// Watch history, unique by video id, most recently watched first.
pub struct History {
    list: DocumentList<HistoryEntry>,
}

impl History {
    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self {
            list: DocumentList::<HistoryEntry>::new(store, HISTORY_KEY).normalized_by(|items| {
                dedup_by_key(items, |e| e.video.id.clone());
                items.truncate(HISTORY_LIMIT);
            }),
        }
    }

    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.list.snapshot().await
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.list.read(|items| items.iter().any(|e| e.id() == id)).await
    }

    /// Record `video` as watched now.
    pub async fn add(&self, video: VideoArtifact) -> Result<()> {
        self.add_at(video, Utc::now()).await
    }

    /// Record `video` as watched at `watched_at`, replacing any earlier entry.
    pub async fn add_at(&self, video: VideoArtifact, watched_at: DateTime<Utc>) -> Result<()> {
        self.list
            .mutate(|items| {
                items.retain(|e| e.video.id != video.id);
                items.insert(0, HistoryEntry::new(video, watched_at));
                items.truncate(HISTORY_LIMIT);
            })
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.list
            .mutate(|items| {
                let before = items.len();
                items.retain(|e| e.id() != id);
                items.len() != before
            })
            .await
    }

    /// Remove the entry for `video` if present, otherwise record it now.
    ///
    /// Returns `true` when the video is in the history after the call.
    pub async fn toggle(&self, video: VideoArtifact) -> Result<bool> {
        let watched_at = Utc::now();
        self.list
            .mutate(|items| {
                if let Some(pos) = items.iter().position(|e| e.id() == video.id) {
                    items.remove(pos);
                    false
                } else {
                    items.insert(0, HistoryEntry::new(video, watched_at));
                    items.truncate(HISTORY_LIMIT);
                    true
                }
            })
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.list.mutate(|items| items.clear()).await?;
        tracing::info!("Watch history cleared");
        Ok(())
    }
}
