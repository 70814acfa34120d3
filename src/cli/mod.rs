pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DownloadQuality;

#[derive(Parser)]
#[command(name = "paperbites")]
#[command(about = "Browse research-paper videos from the terminal", long_about = None)]
pub struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Catalog API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through the video feed
    Feed {
        /// Only show videos matching this keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show a single video
    Show {
        /// Video id
        id: String,
    },
    /// Mark a video as watched
    Watch {
        /// Video id
        id: String,
    },
    /// Show the paper behind a video
    Paper {
        /// Paper id
        id: String,
    },
    /// List popular topics
    Topics,
    /// Search videos (or papers) and remember the query
    Search {
        /// Search terms
        query: String,

        /// Search the paper index instead of the video catalog
        #[arg(long)]
        papers: bool,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Manage favorite videos
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Manage watch history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Manage recent searches
    Searches {
        #[command(subcommand)]
        action: Option<SearchesAction>,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorites
    List,
    /// Add or remove a video by id
    Toggle { id: String },
    /// Remove a video by id
    Remove { id: String },
    /// Remove all favorites
    Clear,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List watched videos
    List,
    /// Forget a watched video
    Remove { id: String },
    /// Forget everything
    Clear,
}

#[derive(Subcommand)]
pub enum SearchesAction {
    /// List recent searches
    List,
    /// Forget a search term
    Remove { term: String },
    /// Forget all searches
    Clear,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings
    Show,
    /// Change one or more settings
    Set(SettingsArgs),
    /// Restore defaults
    Reset,
}

#[derive(Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub autoplay: Option<bool>,

    #[arg(long)]
    pub dark_mode: Option<bool>,

    /// low, medium or high
    #[arg(long)]
    pub quality: Option<DownloadQuality>,

    #[arg(long)]
    pub push: Option<bool>,
}
