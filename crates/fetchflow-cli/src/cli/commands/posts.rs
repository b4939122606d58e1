//! `fetchflow recent` and `fetchflow search <term>`.

use std::time::Duration;

use anyhow::{Context, Result};
use fetchflow_core::api::{DataSource, Post};
use fetchflow_core::flow::{lift, with_timeout};
use fetchflow_core::pipeline::Pipeline;

pub async fn run_recent<S: DataSource>(pipeline: &Pipeline<S>, limit: usize) -> Result<()> {
    let posts = pipeline.recent_posts(limit).await?;
    print_posts(&posts);
    Ok(())
}

/// The whole search, including its own retries, must finish within `timeout`.
pub async fn run_search<S: DataSource>(
    pipeline: &Pipeline<S>,
    term: &str,
    timeout: Duration,
) -> Result<()> {
    let posts = with_timeout(lift(pipeline.search_posts_by_title(term)), timeout)
        .await
        .with_context(|| format!("search for {:?}", term))?;
    println!("{} post(s) with {:?} in the title:", posts.len(), term);
    print_posts(&posts);
    Ok(())
}

fn print_posts(posts: &[Post]) {
    for post in posts {
        println!("  #{:<4} user {:<3} {}", post.id, post.user_id, post.title);
    }
}
