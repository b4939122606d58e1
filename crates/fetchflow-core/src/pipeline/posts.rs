//! Post views: recent posts, title search, statistics.

use crate::api::{Accessor, DataSource, Post, User};

use super::{Pipeline, PipelineError, PosterCount, PostsStats};

impl<S: DataSource> Pipeline<S> {
    /// The `limit` posts with the highest ids, newest first.
    pub async fn recent_posts(&self, limit: usize) -> Result<Vec<Post>, PipelineError> {
        let mut posts = self
            .call(Accessor::Posts, || self.source.fetch_posts())
            .await?;
        let total = posts.len();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts.truncate(limit);
        tracing::info!(returned = posts.len(), total, "recent posts");
        Ok(posts)
    }

    /// Posts whose title contains `term`, ignoring case.
    pub async fn search_posts_by_title(&self, term: &str) -> Result<Vec<Post>, PipelineError> {
        let needle = term.to_lowercase();
        let posts = self
            .call(Accessor::Posts, || self.source.fetch_posts())
            .await?;
        let found: Vec<Post> = posts
            .into_iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .collect();
        tracing::info!(term, found = found.len(), "title search");
        Ok(found)
    }

    /// Totals, average and per-user counts; users and posts are fetched
    /// concurrently.
    pub async fn posts_stats(&self) -> Result<PostsStats, PipelineError> {
        let (users, posts) = tokio::try_join!(
            self.call(Accessor::Users, || self.source.fetch_users()),
            self.call(Accessor::Posts, || self.source.fetch_posts()),
        )?;
        let stats = compute_stats(&users, &posts);
        tracing::info!(
            posts = stats.total_posts,
            users = stats.total_users,
            average = stats.average_posts_per_user,
            "posts stats"
        );
        Ok(stats)
    }
}

pub(super) fn compute_stats(users: &[User], posts: &[Post]) -> PostsStats {
    let total_posts = posts.len();
    let total_users = users.len();
    let average_posts_per_user = if total_users > 0 {
        round2(total_posts as f64 / total_users as f64)
    } else {
        0.0
    };

    let mut posts_by_user: Vec<PosterCount> = users
        .iter()
        .map(|user| PosterCount {
            user_id: user.id,
            user_name: user.name.clone(),
            post_count: posts.iter().filter(|p| p.user_id == user.id).count(),
        })
        .collect();
    // Stable: ties keep user order.
    posts_by_user.sort_by(|a, b| b.post_count.cmp(&a.post_count));

    PostsStats {
        total_posts,
        total_users,
        average_posts_per_user,
        top_poster: posts_by_user.first().cloned(),
        posts_by_user,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
