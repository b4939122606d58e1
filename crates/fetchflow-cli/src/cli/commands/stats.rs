//! `fetchflow stats` – post statistics across all users.

use anyhow::Result;
use fetchflow_core::api::DataSource;
use fetchflow_core::pipeline::Pipeline;

pub async fn run_stats<S: DataSource>(pipeline: &Pipeline<S>) -> Result<()> {
    let stats = pipeline.posts_stats().await?;
    println!("Posts:          {}", stats.total_posts);
    println!("Users:          {}", stats.total_users);
    println!("Posts per user: {:.2}", stats.average_posts_per_user);
    if let Some(top) = &stats.top_poster {
        println!("Top poster:     {} ({} posts)", top.user_name, top.post_count);
    }
    for row in &stats.posts_by_user {
        println!("  {:>4}  {:<24} {}", row.user_id, row.user_name, row.post_count);
    }
    Ok(())
}
