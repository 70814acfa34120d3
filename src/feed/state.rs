use crate::domain::VideoArtifact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Empty,
    Loading,
    Loaded,
    LoadingMore,
    Error,
}

/// Which fetch put the feed into [`FeedStatus::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page arrived and was applied.
    Loaded { added: usize, has_more: bool },
    /// Nothing was requested: a fetch was already in flight or the end was reached.
    Skipped,
    /// The response arrived after a refresh and was discarded.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub outcome: LoadOutcome,
    /// Position of the requested id in the fresh page, if it is there.
    pub target_index: Option<usize>,
}

/// Point-in-time copy of the feed for rendering.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub status: FeedStatus,
    pub items: Vec<VideoArtifact>,
    pub has_more: bool,
    pub active_index: Option<usize>,
    pub last_error: Option<String>,
}

impl FeedSnapshot {
    pub fn active_item(&self) -> Option<&VideoArtifact> {
        self.active_index.and_then(|i| self.items.get(i))
    }

    pub fn can_retry(&self) -> bool {
        self.status == FeedStatus::Error
    }
}

/// Paging state saved before a fetch starts, restored if the fetch is dropped.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    status: FeedStatus,
    failed: Option<FetchKind>,
    offset: usize,
    has_more: bool,
}

#[derive(Debug)]
pub(crate) struct FeedInner {
    pub status: FeedStatus,
    pub items: Vec<VideoArtifact>,
    pub offset: usize,
    pub has_more: bool,
    /// Bumped by every reset; responses tagged with an older value are dropped.
    pub generation: u64,
    pub in_flight: bool,
    pub active_id: Option<String>,
    pub last_error: Option<String>,
    pub failed: Option<FetchKind>,
}

impl FeedInner {
    pub fn new() -> Self {
        Self {
            status: FeedStatus::Empty,
            items: Vec::new(),
            offset: 0,
            has_more: false,
            generation: 0,
            in_flight: false,
            active_id: None,
            last_error: None,
            failed: None,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        // A fetch preempted by this one settles as whatever it was loading into
        let status = match self.status {
            FeedStatus::Loading | FeedStatus::LoadingMore if self.items.is_empty() => {
                FeedStatus::Empty
            }
            FeedStatus::Loading | FeedStatus::LoadingMore => FeedStatus::Loaded,
            status => status,
        };

        Checkpoint {
            status,
            failed: self.failed,
            offset: self.offset,
            has_more: self.has_more,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.status = checkpoint.status;
        self.failed = checkpoint.failed;
        self.offset = checkpoint.offset;
        self.has_more = checkpoint.has_more;
        self.in_flight = false;
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|v| v.id == id)
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            status: self.status,
            items: self.items.clone(),
            has_more: self.has_more,
            active_index: self.active_id.as_deref().and_then(|id| self.index_of(id)),
            last_error: self.last_error.clone(),
        }
    }
}
