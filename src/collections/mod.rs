//! Durable, typed collections layered over a shared [`Store`].
//!
//! Each collection loads its document once, on first access, into an
//! in-memory working copy. Mutations update that copy and then write the
//! whole document back. A failed write is reported to the caller but the
//! in-memory change is kept: the list the user sees stays responsive even
//! when the disk does not.
//!
//! The working copy sits behind an async mutex that is held across the
//! durable write, so two mutations on the same collection always land on
//! disk in call order.

mod favorites;
mod history;
mod recent;
mod settings;

pub use favorites::Favorites;
pub use history::{History, HISTORY_LIMIT};
pub use recent::{RecentSearches, DEFAULT_RECENT_SEARCH_LIMIT};
pub use settings::SettingsStore;

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::app::Result;
use crate::store::Store;

/// Read `key` from the store, falling back to `default` when the document is
/// missing or malformed. A missing document is initialized with `default`
/// without overwriting anything already there.
///
/// A failed read is returned as an error. The document may still be intact,
/// so callers must not write a fallback over it.
pub(crate) async fn load_document<T>(
    store: &(dyn Store + Send + Sync),
    key: &str,
    default: impl FnOnce() -> T,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let stored = match store.get(key).await {
        Ok(stored) => stored,
        Err(e) if e.is_serialization() => {
            tracing::warn!("Ignoring unreadable document {}: {}", key, e);
            return Ok(default());
        }
        Err(e) => {
            tracing::warn!("Failed to read document {}: {}", key, e);
            return Err(e);
        }
    };

    match stored {
        Some(value) => match serde_json::from_value(value) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                tracing::warn!("Ignoring malformed document {}: {}", key, e);
                Ok(default())
            }
        },
        None => {
            let doc = default();
            match serde_json::to_value(&doc) {
                Ok(value) => {
                    if let Err(e) = store.insert_if_absent(key, &value).await {
                        tracing::warn!("Failed to initialize document {}: {}", key, e);
                    }
                }
                Err(e) => tracing::warn!("Failed to encode default {}: {}", key, e),
            }
            Ok(doc)
        }
    }
}

/// Keep the first item for each key, preserving order.
pub(crate) fn dedup_by_key<T, K>(items: &mut Vec<T>, key: impl Fn(&T) -> K)
where
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(key(item)));
}

type Normalize<T> = Box<dyn Fn(&mut Vec<T>) + Send + Sync>;

/// Ordered, most-recent-first list persisted as a single JSON array.
pub(crate) struct DocumentList<T> {
    store: Arc<dyn Store + Send + Sync>,
    key: &'static str,
    normalize: Normalize<T>,
    items: Mutex<Option<Vec<T>>>,
}

impl<T> DocumentList<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + 'static,
{
    pub(crate) fn new(store: Arc<dyn Store + Send + Sync>, key: &'static str) -> Self {
        Self {
            store,
            key,
            normalize: Box::new(|_: &mut Vec<T>| {}),
            items: Mutex::new(None),
        }
    }

    /// Run `f` over the list once, right after it is loaded.
    ///
    /// Documents written by older builds or with other limits are brought in
    /// line with the collection's rules here.
    pub(crate) fn normalized_by(mut self, f: impl Fn(&mut Vec<T>) + Send + Sync + 'static) -> Self {
        self.normalize = Box::new(f);
        self
    }

    /// The working copy, loading it on first access.
    ///
    /// A failed read leaves the slot empty so the next access reads again.
    async fn loaded(&self) -> Result<MappedMutexGuard<'_, Vec<T>>> {
        let mut guard = self.items.lock().await;
        if guard.is_none() {
            let mut items = load_document(self.store.as_ref(), self.key, Vec::new).await?;
            let stored = items.len();
            (self.normalize)(&mut items);
            if items.len() != stored {
                tracing::info!(
                    "Normalized {}: {} entries kept of {}",
                    self.key,
                    items.len(),
                    stored
                );
            }
            tracing::debug!("Loaded {} entries from {}", items.len(), self.key);
            *guard = Some(items);
        }
        Ok(MutexGuard::map(guard, |slot| slot.get_or_insert_with(Vec::new)))
    }

    /// The current list, or an empty one while the document cannot be read.
    pub(crate) async fn snapshot(&self) -> Vec<T> {
        match self.loaded().await {
            Ok(items) => items.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub(crate) async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        match self.loaded().await {
            Ok(items) => f(&items),
            Err(_) => f(&[]),
        }
    }

    /// Apply `f` to the working copy, then persist the whole list.
    ///
    /// Fails without calling `f` when the document cannot be read. The
    /// in-memory change stands even if persisting fails.
    pub(crate) async fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> Result<R> {
        let mut items = self.loaded().await?;
        let out = f(&mut items);

        let written = match serde_json::to_value(&*items) {
            Ok(doc) => self.store.set(self.key, &doc).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = written {
            tracing::warn!("Failed to persist {}: {}", self.key, e);
            return Err(e);
        }

        Ok(out)
    }
}
