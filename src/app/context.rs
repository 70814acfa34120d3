use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{PaperbitesError, Result};
use crate::catalog::{Catalog, HttpCatalog};
use crate::collections::{Favorites, History, RecentSearches, SettingsStore};
use crate::config::Config;
use crate::feed::{FeedController, FeedOptions};
use crate::store::{MemoryStore, SqliteStore, Store};

/// One store, one set of collections, shared by every consumer.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn Store + Send + Sync>,
    pub catalog: Arc<dyn Catalog + Send + Sync>,
    pub favorites: Arc<Favorites>,
    pub history: Arc<History>,
    pub recent_searches: Arc<RecentSearches>,
    pub settings: Arc<SettingsStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match config.storage.db_path.clone() {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store: Arc<dyn Store + Send + Sync> = Arc::new(SqliteStore::new(&db_path)?);
        let catalog: Arc<dyn Catalog + Send + Sync> = Arc::new(HttpCatalog::new(&config.catalog)?);
        tracing::debug!("Using database {}", db_path.display());

        Ok(Self::with_parts(config, store, catalog))
    }

    /// Context backed by a throwaway in-memory store.
    pub fn in_memory(config: Config) -> Result<Self> {
        let store: Arc<dyn Store + Send + Sync> = Arc::new(MemoryStore::new());
        let catalog: Arc<dyn Catalog + Send + Sync> = Arc::new(HttpCatalog::new(&config.catalog)?);
        Ok(Self::with_parts(config, store, catalog))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn Store + Send + Sync>,
        catalog: Arc<dyn Catalog + Send + Sync>,
    ) -> Self {
        let favorites = Arc::new(Favorites::new(store.clone()));
        let history = Arc::new(History::new(store.clone()));
        let recent_searches = Arc::new(RecentSearches::with_limit(
            store.clone(),
            config.storage.recent_search_limit,
        ));
        let settings = Arc::new(SettingsStore::new(store.clone()));

        Self {
            config,
            store,
            catalog,
            favorites,
            history,
            recent_searches,
            settings,
        }
    }

    /// A new feed over the catalog, optionally filtered by `keyword`.
    pub fn feed(&self, keyword: Option<String>) -> FeedController {
        let options = FeedOptions::from_config(&self.config).with_keyword(keyword);
        FeedController::new(self.catalog.clone(), self.history.clone(), options)
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| PaperbitesError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("paperbites");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("paperbites.db"))
    }
}
