//! Configuration management for Paperbites.
//!
//! Configuration is read from `~/.config/paperbites/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collections::DEFAULT_RECENT_SEARCH_LIMIT;

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Largest page the catalog serves; bigger requests are rejected with 422.
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub feed: FeedConfig,
    pub storage: StorageConfig,
}

/// Remote catalog endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL the `/videos`, `/topics`, `/search` and `/paper` paths hang off
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Only request videos cleared for public display (default: true)
    pub public_only: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 10,
            public_only: true,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Items requested per page, at most 100 (default: 10)
    pub page_size: usize,
    /// Fraction of an item that must be on screen for it to become active (default: 0.5)
    pub visibility_threshold: f32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Number of recent searches kept (default: 10)
    pub recent_search_limit: usize,
    /// Database location; defaults to the platform data directory
    pub db_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            recent_search_limit: DEFAULT_RECENT_SEARCH_LIMIT,
            db_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config.validated())
    }

    /// Get the default config file path: `~/.config/paperbites/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("paperbites").join("config.toml"))
    }

    /// Clamp values that would make the feed unusable.
    fn validated(mut self) -> Self {
        if self.feed.page_size == 0 {
            tracing::warn!("feed.page_size must be positive, using {}", DEFAULT_PAGE_SIZE);
            self.feed.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.feed.page_size > MAX_PAGE_SIZE {
            tracing::warn!(
                "feed.page_size {} exceeds the catalog maximum, using {}",
                self.feed.page_size,
                MAX_PAGE_SIZE
            );
            self.feed.page_size = MAX_PAGE_SIZE;
        }
        if !(self.feed.visibility_threshold > 0.0 && self.feed.visibility_threshold <= 1.0) {
            tracing::warn!(
                "feed.visibility_threshold must be in (0, 1], using {}",
                DEFAULT_VISIBILITY_THRESHOLD
            );
            self.feed.visibility_threshold = DEFAULT_VISIBILITY_THRESHOLD;
        }
        if self.storage.recent_search_limit == 0 {
            self.storage.recent_search_limit = DEFAULT_RECENT_SEARCH_LIMIT;
        }
        self
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# Paperbites Configuration

[catalog]
# Base URL of the video catalog API
base_url = "http://localhost:8000/api"

# Request timeout in seconds
timeout_secs = 10

# Only show videos whose paper license allows public display
public_only = true

[feed]
# Videos fetched per page (1 - 100)
page_size = 10

# Fraction of a video (0.0 - 1.0] that must be visible before it starts playing
visibility_threshold = 0.5

[storage]
# How many recent searches to remember
recent_search_limit = 10

# Database location (default: platform data directory)
# db_path = "/path/to/paperbites.db"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.catalog.base_url, "http://localhost:8000/api");
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.storage.recent_search_limit, 10);
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[feed]
visibility_threshold = 0.9
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.feed.visibility_threshold, 0.9);
        assert_eq!(config.feed.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.catalog.public_only);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.catalog.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_clamps_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[feed]\npage_size = 0\nvisibility_threshold = 1.5\n[storage]\nrecent_search_limit = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.feed.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.feed.visibility_threshold, DEFAULT_VISIBILITY_THRESHOLD);
        assert_eq!(config.storage.recent_search_limit, 5);
    }

    #[test]
    fn test_load_from_caps_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feed]\npage_size = 200\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.feed.page_size, MAX_PAGE_SIZE);

        fs::write(&path, "[feed]\npage_size = 100\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().feed.page_size, 100);
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feed\npage_size = ").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
