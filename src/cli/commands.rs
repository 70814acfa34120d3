use chrono::Local;

use crate::app::{AppContext, PaperbitesError, Result};
use crate::config::MAX_PAGE_SIZE;
use crate::cli::{FavoritesAction, HistoryAction, SearchesAction, SettingsAction, SettingsArgs};
use crate::domain::{PageQuery, SettingsUpdate, VideoArtifact};
use crate::feed::LoadOutcome;

fn print_video(index: usize, video: &VideoArtifact) {
    println!("{:>3}. {} [{}]", index + 1, video.display_title(), video.id);
}

pub async fn show_feed(ctx: &AppContext, keyword: Option<String>, pages: usize) -> Result<()> {
    let feed = ctx.feed(keyword);

    feed.load_initial().await?;
    for _ in 1..pages {
        if let LoadOutcome::Skipped = feed.load_more().await? {
            break;
        }
    }

    let items = feed.items();
    if items.is_empty() {
        println!("No videos");
        return Ok(());
    }

    for (i, video) in items.iter().enumerate() {
        print_video(i, video);
    }
    if feed.has_more() {
        println!("(more available, use --pages to load further)");
    }
    Ok(())
}

pub async fn show_video(ctx: &AppContext, id: &str) -> Result<()> {
    let video = match ctx.catalog.fetch_by_id(id).await {
        Ok(video) => video,
        Err(PaperbitesError::NotFound(_)) => {
            println!("Video not found: {}", id);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("{}", video.display_title());
    println!("  id:       {}", video.id);
    println!("  video:    {}", video.video_url);
    if let Some(ref doi) = video.doi {
        println!("  doi:      {}", doi);
    }
    if let Some(ref url) = video.paper_url {
        println!("  paper:    {}", url);
    }
    if !video.keywords.is_empty() {
        println!("  keywords: {}", video.keywords.join(", "));
    }
    if ctx.favorites.contains(&video.id).await {
        println!("  ★ favorite");
    }
    if !video.summary.is_empty() {
        println!();
        println!("{}", video.summary);
    }
    for insight in &video.key_insights {
        println!("  • {}", insight);
    }
    Ok(())
}

pub async fn watch_video(ctx: &AppContext, id: &str) -> Result<()> {
    let video = ctx.catalog.fetch_by_id(id).await?;
    println!("Watching: {}", video.display_title());
    ctx.history.add(video).await
}

pub async fn show_paper(ctx: &AppContext, id: &str) -> Result<()> {
    let paper = match ctx.catalog.fetch_paper(id).await {
        Ok(paper) => paper,
        Err(PaperbitesError::NotFound(_)) => {
            println!("Paper not found: {}", id);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("{}", paper.title);
    if !paper.authors.is_empty() {
        println!("  authors: {}", paper.authors.join(", "));
    }
    if !paper.url.is_empty() {
        println!("  url:     {}", paper.url);
    }
    if let Some(ref license) = paper.license {
        println!("  license: {}", license);
    }
    if let Some(ref summary) = paper.summary {
        println!();
        println!("{}", summary);
    }
    Ok(())
}

pub async fn list_topics(ctx: &AppContext) -> Result<()> {
    let topics = ctx.catalog.fetch_topics().await?;
    if topics.is_empty() {
        println!("No topics");
    }
    for topic in topics {
        println!("{}", topic);
    }
    Ok(())
}

pub async fn search(ctx: &AppContext, query: &str, papers: bool, limit: usize) -> Result<()> {
    if let Err(e) = ctx.recent_searches.add(query).await {
        eprintln!("Could not save search: {}", e);
    }

    if papers {
        let results = ctx
            .catalog
            .search_papers(query, limit, ctx.config.catalog.public_only)
            .await?;
        if results.is_empty() {
            println!("No papers found");
        }
        for (i, paper) in results.iter().enumerate() {
            println!("{:>3}. {} <{}>", i + 1, paper.title, paper.url);
        }
        return Ok(());
    }

    let query = PageQuery::new(limit.clamp(1, MAX_PAGE_SIZE), 0)
        .with_keyword(Some(query.to_string()))
        .with_public_only(Some(ctx.config.catalog.public_only));
    let page = ctx.catalog.fetch_page(&query).await?;
    if page.is_empty() {
        println!("No videos found");
    }
    for (i, video) in page.items.iter().enumerate() {
        print_video(i, video);
    }

    let keyword = query.keyword.as_deref().unwrap_or_default();
    let saved = saved_matches(ctx, keyword).await;
    if !saved.is_empty() {
        println!();
        println!("In your favorites:");
        for (i, video) in saved.iter().enumerate() {
            print_video(i, video);
        }
    }
    Ok(())
}

/// Favorites matching `keyword`, none for a blank keyword.
async fn saved_matches(ctx: &AppContext, keyword: &str) -> Vec<VideoArtifact> {
    if keyword.is_empty() {
        return Vec::new();
    }
    ctx.favorites
        .list()
        .await
        .into_iter()
        .filter(|v| v.matches_keyword(keyword))
        .collect()
}

pub async fn favorites(ctx: &AppContext, action: FavoritesAction) -> Result<()> {
    match action {
        FavoritesAction::List => {
            let favorites = ctx.favorites.list().await;
            if favorites.is_empty() {
                println!("No favorites");
            }
            for (i, video) in favorites.iter().enumerate() {
                print_video(i, video);
            }
        }
        FavoritesAction::Toggle { id } => {
            let existing = ctx.favorites.list().await.into_iter().find(|v| v.id == id);
            let video = match existing {
                Some(video) => video,
                None => ctx.catalog.fetch_by_id(&id).await?,
            };
            let title = video.display_title().to_string();
            if ctx.favorites.toggle(video).await? {
                println!("Added to favorites: {}", title);
            } else {
                println!("Removed from favorites: {}", title);
            }
        }
        FavoritesAction::Remove { id } => {
            if ctx.favorites.remove(&id).await? {
                println!("Removed from favorites: {}", id);
            } else {
                println!("Not a favorite: {}", id);
            }
        }
        FavoritesAction::Clear => {
            ctx.favorites.clear().await?;
            println!("Favorites cleared");
        }
    }
    Ok(())
}

pub async fn history(ctx: &AppContext, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List => {
            let entries = ctx.history.list().await;
            if entries.is_empty() {
                println!("No watch history");
            }
            for entry in entries {
                println!(
                    "{}  {} [{}]",
                    entry.watched_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    entry.video.display_title(),
                    entry.id()
                );
            }
        }
        HistoryAction::Remove { id } => {
            if ctx.history.remove(&id).await? {
                println!("Removed from history: {}", id);
            } else {
                println!("Not in history: {}", id);
            }
        }
        HistoryAction::Clear => {
            ctx.history.clear().await?;
            println!("History cleared");
        }
    }
    Ok(())
}

pub async fn searches(ctx: &AppContext, action: SearchesAction) -> Result<()> {
    match action {
        SearchesAction::List => {
            let terms = ctx.recent_searches.list().await;
            if terms.is_empty() {
                println!("No recent searches");
                return Ok(());
            }
            for term in &terms {
                println!("{}", term);
            }
            println!(
                "({} of the last {} searches kept)",
                terms.len(),
                ctx.recent_searches.limit()
            );
        }
        SearchesAction::Remove { term } => {
            ctx.recent_searches.remove(&term).await?;
            println!("Removed: {}", term.trim());
        }
        SearchesAction::Clear => {
            ctx.recent_searches.clear().await?;
            println!("Recent searches cleared");
        }
    }
    Ok(())
}

pub async fn settings(ctx: &AppContext, action: SettingsAction) -> Result<()> {
    let settings = match action {
        SettingsAction::Show => ctx.settings.get().await,
        SettingsAction::Set(args) => {
            let update = settings_update(args);
            if update.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }
            ctx.settings.update(update).await?
        }
        SettingsAction::Reset => {
            ctx.settings.reset().await?;
            ctx.settings.get().await
        }
    };

    println!("autoplay:           {}", settings.autoplay);
    println!("dark mode:          {}", settings.dark_mode);
    println!("download quality:   {}", settings.download_quality);
    println!("push notifications: {}", settings.push_notifications);
    Ok(())
}

fn settings_update(args: SettingsArgs) -> SettingsUpdate {
    SettingsUpdate {
        autoplay: args.autoplay,
        dark_mode: args.dark_mode,
        download_quality: args.quality,
        push_notifications: args.push,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::DownloadQuality;

    #[tokio::test]
    async fn test_settings_set_merges() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let args = SettingsArgs {
            autoplay: None,
            dark_mode: Some(true),
            quality: Some(DownloadQuality::Low),
            push: None,
        };

        settings(&ctx, SettingsAction::Set(args)).await.unwrap();

        let current = ctx.settings.get().await;
        assert!(current.dark_mode);
        assert!(current.autoplay);
        assert_eq!(current.download_quality, DownloadQuality::Low);
    }

    #[tokio::test]
    async fn test_saved_matches_filters_favorites() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let mut graphs = VideoArtifact::new("g", "Graph Networks", "https://x/g.mp4");
        graphs.keywords = vec!["GNN".into()];
        ctx.favorites.add(graphs).await.unwrap();
        ctx.favorites
            .add(VideoArtifact::new("p", "Protein Folding", "https://x/p.mp4"))
            .await
            .unwrap();

        let found = saved_matches(&ctx, "gnn").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "g");
        assert!(saved_matches(&ctx, "").await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_favorite_is_ok() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        favorites(&ctx, FavoritesAction::Remove { id: "x".into() })
            .await
            .unwrap();
        assert!(ctx.favorites.list().await.is_empty());
    }
}
