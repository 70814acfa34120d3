use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paperbites::app::AppContext;
use paperbites::cli::{
    commands, Cli, Commands, FavoritesAction, HistoryAction, SearchesAction, SettingsAction,
};
use paperbites::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(db) = cli.db {
        config.storage.db_path = Some(db);
    }
    if let Some(api) = cli.api {
        config.catalog.base_url = api;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Feed { keyword, pages } => {
            commands::show_feed(&ctx, keyword, pages).await?;
        }
        Commands::Show { id } => {
            commands::show_video(&ctx, &id).await?;
        }
        Commands::Watch { id } => {
            commands::watch_video(&ctx, &id).await?;
        }
        Commands::Paper { id } => {
            commands::show_paper(&ctx, &id).await?;
        }
        Commands::Topics => {
            commands::list_topics(&ctx).await?;
        }
        Commands::Search {
            query,
            papers,
            limit,
        } => {
            commands::search(&ctx, &query, papers, limit).await?;
        }
        Commands::Favorites { action } => {
            commands::favorites(&ctx, action.unwrap_or(FavoritesAction::List)).await?;
        }
        Commands::History { action } => {
            commands::history(&ctx, action.unwrap_or(HistoryAction::List)).await?;
        }
        Commands::Searches { action } => {
            commands::searches(&ctx, action.unwrap_or(SearchesAction::List)).await?;
        }
        Commands::Settings { action } => {
            commands::settings(&ctx, action.unwrap_or(SettingsAction::Show)).await?;
        }
    }

    Ok(())
}
