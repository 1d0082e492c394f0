//! Feed command handlers

use crate::cli::PageArgs;
use crate::config::Config;
use crate::domain::Page;
use crate::models::PostView;
use crate::state::SharedState;

pub async fn cmd_timeline(config: &Config, username: &str, page: PageArgs) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let user = state.user_service.get_by_username(username).await?;

    let per_page = page
        .per_page
        .unwrap_or_else(|| i64::from(config.feed.posts_per_page));
    let feed = state
        .feed_service
        .timeline(user.id, page.page, per_page)
        .await?;

    println!("Timeline for {}", user.username);
    print_page(&feed);
    Ok(())
}

pub async fn cmd_explore(config: &Config, page: PageArgs) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let per_page = page
        .per_page
        .unwrap_or_else(|| i64::from(config.feed.posts_per_page));
    let feed = state.feed_service.explore(page.page, per_page).await?;

    println!("Explore");
    print_page(&feed);
    Ok(())
}

fn print_page(feed: &Page<PostView>) {
    println!("{:-<70}", "");

    if feed.items.is_empty() {
        println!("No posts.");
    }

    for post in &feed.items {
        println!("{} · {}", post.author, post.timestamp);
        println!("  {}", post.body);
    }

    println!("{:-<70}", "");
    println!(
        "Page {} of {} ({} posts)",
        feed.page,
        feed.pages.max(1),
        feed.total
    );
    if let Some(prev) = feed.prev_page {
        println!("  Newer: --page {prev}");
    }
    if let Some(next) = feed.next_page {
        println!("  Older: --page {next}");
    }
}
