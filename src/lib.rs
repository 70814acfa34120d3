//! # Paperbites
//!
//! Client core for a scrolling feed of research-paper videos.
//!
//! ## Architecture
//!
//! ```text
//! Catalog API → Catalog → FeedController → presentation
//!                              │
//!                              ▼
//!               Collections → Store (SQLite)
//! ```
//!
//! - [`catalog`]: HTTP access to the remote video catalog
//! - [`feed`]: pagination and active-item state machine
//! - [`collections`]: favorites, watch history, recent searches, settings
//! - [`store`]: key to JSON-document persistence
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse the first two pages
//! paperbites feed --pages 2
//!
//! # Search and remember the query
//! paperbites search "protein folding"
//!
//! # Toggle a favorite
//! paperbites favorites toggle 3f1c
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the collections and the catalog client.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Remote catalog access.
///
/// - [`Catalog`](catalog::Catalog): Async trait for catalog queries
/// - [`HttpCatalog`](catalog::HttpCatalog): reqwest-based implementation
pub mod catalog;

/// Persistent user collections with dedup, ordering and caps.
pub mod collections;

/// Configuration loaded from `~/.config/paperbites/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`VideoArtifact`](domain::VideoArtifact): a catalog video
/// - [`FeedPage`](domain::FeedPage): one page of catalog results
/// - [`HistoryEntry`](domain::HistoryEntry): a watched video
/// - [`Settings`](domain::Settings): user preferences
pub mod domain;

/// Feed pagination and active-item tracking.
pub mod feed;

/// Document persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`MemoryStore`](store::MemoryStore): in-process implementation
pub mod store;
