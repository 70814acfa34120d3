use serde::{Deserialize, Serialize};

use crate::domain::VideoArtifact;

/// Parameters of a single `GET /videos` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub limit: usize,
    pub offset: usize,
    pub keyword: Option<String>,
    pub public_only: Option<bool>,
}

impl PageQuery {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            keyword: None,
            public_only: None,
        }
    }

    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_public_only(mut self, public_only: Option<bool>) -> Self {
        self.public_only = public_only;
        self
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<VideoArtifact>,
    pub offset: usize,
    /// Page size that was requested, not the number of items returned.
    pub limit: usize,
    /// Total number of matching items, when the catalog reports one.
    pub total: Option<usize>,
}

impl FeedPage {
    pub fn new(items: Vec<VideoArtifact>, offset: usize, limit: usize) -> Self {
        Self {
            items,
            offset,
            limit,
            total: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another page may exist after this one.
    ///
    /// An explicit total wins. Without one, a full page is taken to mean more
    /// data exists, so a final page of exactly `limit` items needs one extra
    /// (empty) fetch to discover the end.
    pub fn has_more(&self) -> bool {
        match self.total {
            Some(total) => self.offset + self.items.len() < total,
            None => self.limit > 0 && self.items.len() >= self.limit,
        }
    }
}
