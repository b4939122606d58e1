//! `fetchflow active`, `fetchflow user <id>` and `fetchflow find-user <email>`.

use anyhow::Result;
use fetchflow_core::api::{DataSource, User};
use fetchflow_core::pipeline::Pipeline;

pub async fn run_active<S: DataSource>(pipeline: &Pipeline<S>) -> Result<()> {
    let users = pipeline.active_users().await?;
    if users.is_empty() {
        println!("No active users.");
        return Ok(());
    }
    for user in &users {
        print_user(user);
    }
    println!("{} active user(s).", users.len());
    Ok(())
}

pub async fn run_user<S: DataSource>(pipeline: &Pipeline<S>, id: u64) -> Result<()> {
    let view = pipeline.user_with_posts(id).await?;
    println!(
        "{} ({}) <{}>: {} post(s)",
        view.user.name, view.user.username, view.user.email, view.post_count
    );
    for post in &view.posts {
        println!("  #{:<4} {}", post.id, post.title);
    }
    Ok(())
}

pub async fn run_find_user<S: DataSource>(pipeline: &Pipeline<S>, email: &str) -> Result<()> {
    match pipeline.find_user_by_email(email).await? {
        Some(user) => print_user(&user),
        None => {
            tracing::debug!("no user with email {}", email);
            println!("No user with email {}.", email);
        }
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("{:>4}  {:<24} {:<16} {}", user.id, user.name, user.username, user.email);
}
