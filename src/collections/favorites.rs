use std::sync::Arc;

use crate::app::Result;
use crate::collections::{dedup_by_key, DocumentList};
use crate::domain::VideoArtifact;
use crate::store::{Store, FAVORITES_KEY};

/// Favorite videos, unique by id, most recently added first.
pub struct Favorites {
    list: DocumentList<VideoArtifact>,
}

impl Favorites {
    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self {
            list: DocumentList::<VideoArtifact>::new(store, FAVORITES_KEY)
                .normalized_by(|items| dedup_by_key(items, |v| v.id.clone())),
        }
    }

    pub async fn list(&self) -> Vec<VideoArtifact> {
        self.list.snapshot().await
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.list.read(|items| items.iter().any(|v| v.id == id)).await
    }

    /// Add `video`, moving it to the front if it is already a favorite.
    pub async fn add(&self, video: VideoArtifact) -> Result<()> {
        self.list
            .mutate(|items| {
                items.retain(|v| v.id != video.id);
                items.insert(0, video);
            })
            .await
    }

    /// Returns whether an entry was removed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.list
            .mutate(|items| {
                let before = items.len();
                items.retain(|v| v.id != id);
                items.len() != before
            })
            .await
    }

    /// Add `video` if absent, remove it if present.
    ///
    /// Returns `true` when the video is a favorite after the call.
    pub async fn toggle(&self, video: VideoArtifact) -> Result<bool> {
        self.list
            .mutate(|items| {
                if let Some(pos) = items.iter().position(|v| v.id == video.id) {
                    items.remove(pos);
                    false
                } else {
                    items.insert(0, video);
                    true
                }
            })
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.list.mutate(|items| items.clear()).await
    }
}
