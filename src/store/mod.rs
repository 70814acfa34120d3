pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Document keys of the four local collections.
pub const RECENT_SEARCHES_KEY: &str = "recent-searches";
pub const FAVORITES_KEY: &str = "favorite-videos";
pub const HISTORY_KEY: &str = "watch-history";
pub const SETTINGS_KEY: &str = "app-settings";

/// Key to JSON-document persistence.
///
/// Documents are encoded on write and decoded on read. Every backend failure,
/// including a stored value that no longer parses, comes back as an `Err`.
#[async_trait]
pub trait Store {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, document: &Value) -> Result<()>;
    async fn clear(&self, key: &str) -> Result<()>;

    /// Write `document` only if `key` has no value yet. Returns whether it was written.
    async fn insert_if_absent(&self, key: &str, document: &Value) -> Result<bool>;
}
