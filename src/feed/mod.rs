//! Paginated, scroll-driven video feed.
//!
//! ```text
//! Empty --load_initial--> Loading --ok--> Loaded --load_more--> LoadingMore --ok--> Loaded
//!                            |                                       |
//!                            +---------------err---> Error <---err---+
//! ```
//!
//! A failed fetch keeps whatever was already loaded; [`FeedController::retry`]
//! re-runs the fetch that failed. `load_more` calls that arrive while a fetch
//! is in flight are dropped, not queued. [`FeedController::refresh`] starts a
//! new generation, and responses that belong to an older generation are
//! discarded when they arrive.
//!
//! Dropping a load future before it completes puts the paging state back the
//! way it was, so a cancelled fetch never leaves the feed busy.

mod state;
mod viewability;

pub use state::{FeedSnapshot, FeedStatus, FetchKind, LoadOutcome, RefreshOutcome};
pub use viewability::{select_active, PlaybackEvent, VisibleItem};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::app::Result;
use crate::catalog::Catalog;
use crate::collections::History;
use crate::config::{Config, DEFAULT_PAGE_SIZE, DEFAULT_VISIBILITY_THRESHOLD, MAX_PAGE_SIZE};
use crate::domain::{PageQuery, VideoArtifact};
use state::{Checkpoint, FeedInner};

#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub page_size: usize,
    pub visibility_threshold: f32,
    pub keyword: Option<String>,
    pub public_only: Option<bool>,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            keyword: None,
            public_only: None,
        }
    }
}

impl FeedOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.feed.page_size,
            visibility_threshold: config.feed.visibility_threshold,
            keyword: None,
            public_only: Some(config.catalog.public_only),
        }
    }

    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword;
        self
    }
}

pub struct FeedController {
    catalog: Arc<dyn Catalog + Send + Sync>,
    history: Arc<History>,
    options: FeedOptions,
    inner: Mutex<FeedInner>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<PlaybackEvent>>>,
}

impl FeedController {
    pub fn new(
        catalog: Arc<dyn Catalog + Send + Sync>,
        history: Arc<History>,
        mut options: FeedOptions,
    ) -> Self {
        options.page_size = options.page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            catalog,
            history,
            options,
            inner: Mutex::new(FeedInner::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    fn inner(&self) -> MutexGuard<'_, FeedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn query(&self, offset: usize) -> PageQuery {
        PageQuery::new(self.options.page_size, offset)
            .with_keyword(self.options.keyword.clone())
            .with_public_only(self.options.public_only)
    }

    pub fn status(&self) -> FeedStatus {
        self.inner().status
    }

    pub fn has_more(&self) -> bool {
        self.inner().has_more
    }

    pub fn items(&self) -> Vec<VideoArtifact> {
        self.inner().items.clone()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.inner().snapshot()
    }

    pub fn active_item(&self) -> Option<VideoArtifact> {
        let inner = self.inner();
        let id = inner.active_id.as_deref()?;
        inner.index_of(id).map(|i| inner.items[i].clone())
    }

    /// Receive a `Stop`/`Start` pair every time the active item changes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<PlaybackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Fetch the first page of an empty (or initially failed) feed.
    pub async fn load_initial(&self) -> Result<LoadOutcome> {
        let (generation, checkpoint) = {
            let mut inner = self.inner();
            let ready = match inner.status {
                FeedStatus::Empty => true,
                FeedStatus::Error => inner.failed == Some(FetchKind::Initial),
                _ => false,
            };
            if inner.in_flight || !ready {
                tracing::debug!("Skipping initial load in state {:?}", inner.status);
                return Ok(LoadOutcome::Skipped);
            }
            let checkpoint = inner.checkpoint();
            (Self::begin_reset(&mut inner), checkpoint)
        };

        self.fetch_first(generation, checkpoint).await
    }

    /// Start over from offset zero, replacing the loaded items.
    ///
    /// Preempts any fetch in flight. With `target_id`, also reports where that
    /// id landed in the fresh page.
    pub async fn refresh(&self, target_id: Option<&str>) -> Result<RefreshOutcome> {
        let (generation, checkpoint) = {
            let mut inner = self.inner();
            let checkpoint = inner.checkpoint();
            (Self::begin_reset(&mut inner), checkpoint)
        };
        let outcome = self.fetch_first(generation, checkpoint).await?;

        let target_index = match (outcome, target_id) {
            (LoadOutcome::Loaded { .. }, Some(id)) => self.inner().index_of(id),
            _ => None,
        };

        Ok(RefreshOutcome {
            outcome,
            target_index,
        })
    }

    /// Append the next page. A no-op while a fetch is in flight or after the end.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let (generation, offset, checkpoint) = {
            let mut inner = self.inner();
            let ready = match inner.status {
                FeedStatus::Loaded => true,
                FeedStatus::Error => inner.failed == Some(FetchKind::More),
                _ => false,
            };
            if inner.in_flight || !ready || !inner.has_more {
                tracing::debug!(
                    "Skipping load_more (status: {:?}, in flight: {}, has_more: {})",
                    inner.status,
                    inner.in_flight,
                    inner.has_more
                );
                return Ok(LoadOutcome::Skipped);
            }
            let checkpoint = inner.checkpoint();
            inner.in_flight = true;
            inner.status = FeedStatus::LoadingMore;
            (inner.generation, inner.offset, checkpoint)
        };

        let guard = FetchGuard::new(&self.inner, generation, checkpoint);
        let result = self.catalog.fetch_page(&self.query(offset)).await;
        guard.disarm();

        let mut inner = self.inner();
        if inner.generation != generation {
            tracing::warn!("Discarding stale page at offset {}", offset);
            return Ok(LoadOutcome::Stale);
        }
        inner.in_flight = false;

        match result {
            Ok(page) => {
                let has_more = page.has_more();
                let fetched = page.len();
                inner.offset += fetched;

                let before = inner.items.len();
                for video in page.items {
                    if inner.index_of(&video.id).is_none() {
                        inner.items.push(video);
                    }
                }
                let added = inner.items.len() - before;
                if added < fetched {
                    tracing::debug!("Dropped {} already-loaded videos", fetched - added);
                }

                inner.has_more = has_more;
                inner.status = FeedStatus::Loaded;
                inner.failed = None;
                inner.last_error = None;
                tracing::info!(
                    "Loaded {} more videos ({} total, has_more: {})",
                    added,
                    inner.items.len(),
                    has_more
                );
                Ok(LoadOutcome::Loaded { added, has_more })
            }
            Err(e) => {
                tracing::warn!("Failed to load more videos: {}", e);
                inner.status = FeedStatus::Error;
                inner.failed = Some(FetchKind::More);
                inner.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-run whichever fetch last failed.
    pub async fn retry(&self) -> Result<LoadOutcome> {
        let failed = {
            let inner = self.inner();
            if inner.status != FeedStatus::Error {
                return Ok(LoadOutcome::Skipped);
            }
            inner.failed
        };

        match failed {
            Some(FetchKind::Initial) => self.load_initial().await,
            Some(FetchKind::More) => self.load_more().await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Update the active item from the items currently on screen.
    ///
    /// Returns the playback events emitted, empty when the active item is
    /// unchanged. A newly active item is recorded in the watch history.
    pub async fn report_visible(&self, visible: &[VisibleItem]) -> Vec<PlaybackEvent> {
        let (events, started) = {
            let mut inner = self.inner();
            let threshold = self.options.visibility_threshold;
            let next = select_active(visible, threshold, inner.items.len())
                .and_then(|i| inner.items.get(i).cloned());
            let next_id = next.as_ref().map(|v| v.id.clone());

            if next_id == inner.active_id {
                return Vec::new();
            }

            let previous = std::mem::replace(&mut inner.active_id, next_id);
            let mut events = Vec::with_capacity(2);
            if let Some(id) = previous {
                events.push(PlaybackEvent::Stop { id });
            }
            if let Some(ref video) = next {
                events.push(PlaybackEvent::Start {
                    id: video.id.clone(),
                });
            }
            (events, next)
        };

        if let Some(video) = started {
            tracing::debug!("Active video is now {}", video.id);
            if let Err(e) = self.history.add(video).await {
                tracing::warn!("Failed to record watch history: {}", e);
            }
        }

        self.emit(&events);
        events
    }

    fn emit(&self, events: &[PlaybackEvent]) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|tx| events.iter().all(|e| tx.send(e.clone()).is_ok()));
    }

    fn begin_reset(inner: &mut FeedInner) -> u64 {
        inner.generation += 1;
        inner.in_flight = true;
        inner.status = FeedStatus::Loading;
        inner.offset = 0;
        inner.has_more = false;
        inner.generation
    }

    async fn fetch_first(&self, generation: u64, checkpoint: Checkpoint) -> Result<LoadOutcome> {
        let guard = FetchGuard::new(&self.inner, generation, checkpoint);
        let result = self.catalog.fetch_page(&self.query(0)).await;
        guard.disarm();

        let mut inner = self.inner();
        if inner.generation != generation {
            tracing::warn!("Discarding stale first page (generation {})", generation);
            return Ok(LoadOutcome::Stale);
        }
        inner.in_flight = false;

        match result {
            Ok(page) => {
                let has_more = page.has_more();
                let added = page.len();
                inner.offset = added;
                inner.items = page.items;
                inner.has_more = has_more;
                inner.status = FeedStatus::Loaded;
                inner.failed = None;
                inner.last_error = None;
                tracing::info!("Loaded {} videos (has_more: {})", added, has_more);
                Ok(LoadOutcome::Loaded { added, has_more })
            }
            Err(e) => {
                tracing::warn!("Failed to load feed: {}", e);
                inner.status = FeedStatus::Error;
                inner.failed = Some(FetchKind::Initial);
                inner.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Restores the paging state when a fetch is dropped before its response is applied.
struct FetchGuard<'a> {
    inner: &'a Mutex<FeedInner>,
    generation: u64,
    checkpoint: Option<Checkpoint>,
}

impl<'a> FetchGuard<'a> {
    fn new(inner: &'a Mutex<FeedInner>, generation: u64, checkpoint: Checkpoint) -> Self {
        Self {
            inner,
            generation,
            checkpoint: Some(checkpoint),
        }
    }

    /// The response is in hand; the caller applies it.
    fn disarm(mut self) {
        self.checkpoint = None;
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        let Some(checkpoint) = self.checkpoint.take() else {
            return;
        };

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generation == self.generation && inner.in_flight {
            tracing::debug!(
                "Fetch dropped before completion, restoring {:?}",
                checkpoint
            );
            inner.restore(checkpoint);
        }
    }
}
