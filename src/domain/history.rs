use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::VideoArtifact;

/// A watched video and when it became the active item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub video: VideoArtifact,
    #[serde(rename = "watchedAt")]
    pub watched_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(video: VideoArtifact, watched_at: DateTime<Utc>) -> Self {
        Self { video, watched_at }
    }

    pub fn id(&self) -> &str {
        &self.video.id
    }
}
