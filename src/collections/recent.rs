use std::sync::Arc;

use crate::app::Result;
use crate::collections::{dedup_by_key, DocumentList};
use crate::store::{Store, RECENT_SEARCHES_KEY};

pub const DEFAULT_RECENT_SEARCH_LIMIT: usize = 10;

/// Recently submitted search terms, most recent first.
pub struct RecentSearches {
    list: DocumentList<String>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self::with_limit(store, DEFAULT_RECENT_SEARCH_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn Store + Send + Sync>, limit: usize) -> Self {
        let limit = limit.max(1);
        let list = DocumentList::<String>::new(store, RECENT_SEARCHES_KEY)
            .normalized_by(move |items| normalize_terms(items, limit));

        Self { list, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub async fn list(&self) -> Vec<String> {
        self.list.snapshot().await
    }

    pub async fn contains(&self, term: &str) -> bool {
        let term = term.trim();
        self.list.read(|items| items.iter().any(|t| t == term)).await
    }

    /// Record `term`. Blank input is ignored.
    pub async fn add(&self, term: &str) -> Result<()> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }

        let limit = self.limit;
        self.list
            .mutate(|items| {
                items.retain(|t| t != term);
                items.insert(0, term.to_string());
                items.truncate(limit);
            })
            .await
    }

    pub async fn remove(&self, term: &str) -> Result<bool> {
        let term = term.trim();
        self.list
            .mutate(|items| {
                let before = items.len();
                items.retain(|t| t != term);
                items.len() != before
            })
            .await
    }

    /// Returns `true` when `term` is in the list after the call.
    pub async fn toggle(&self, term: &str) -> Result<bool> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(false);
        }

        let limit = self.limit;
        self.list
            .mutate(|items| {
                if let Some(pos) = items.iter().position(|t| t == term) {
                    items.remove(pos);
                    false
                } else {
                    items.insert(0, term.to_string());
                    items.truncate(limit);
                    true
                }
            })
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.list.mutate(|items| items.clear()).await
    }
}

/// Bring a stored list in line with `add`: trimmed, non-blank, unique, capped.
fn normalize_terms(terms: &mut Vec<String>, limit: usize) {
    for term in terms.iter_mut() {
        if term.trim().len() != term.len() {
            *term = term.trim().to_string();
        }
    }
    terms.retain(|t| !t.is_empty());
    dedup_by_key(terms, |t| t.clone());
    terms.truncate(limit);
}
