//! User views: active users, user with posts, lookup by email.

use crate::api::{Accessor, DataSource, User};

use super::{Pipeline, PipelineError, PostSummary, UserSummary, UserWithPosts};

impl<S: DataSource> Pipeline<S> {
    /// Users with an even id.
    pub async fn active_users(&self) -> Result<Vec<User>, PipelineError> {
        let users = self
            .call(Accessor::Users, || self.source.fetch_users())
            .await?;
        let total = users.len();
        let active: Vec<User> = users.into_iter().filter(|u| u.id % 2 == 0).collect();
        tracing::info!(active = active.len(), total, "active users");
        Ok(active)
    }

    /// The user and their posts, fetched concurrently.
    pub async fn user_with_posts(&self, user_id: u64) -> Result<UserWithPosts, PipelineError> {
        let (user, posts) = tokio::try_join!(
            self.call(Accessor::UserById, || self.source.fetch_user_by_id(user_id)),
            self.call(Accessor::PostsByUser, || self
                .source
                .fetch_posts_by_user(user_id)),
        )?;
        let user = user.ok_or(PipelineError::UserNotFound(user_id))?;
        let posts: Vec<PostSummary> = posts.into_iter().map(PostSummary::from).collect();
        tracing::info!(user_id, posts = posts.len(), "user with posts");
        Ok(UserWithPosts {
            user: UserSummary::from(user),
            post_count: posts.len(),
            posts,
        })
    }

    /// Case-insensitive exact match on the email address.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PipelineError> {
        let wanted = email.to_lowercase();
        let users = self
            .call(Accessor::Users, || self.source.fetch_users())
            .await?;
        let found = users.into_iter().find(|u| u.email.to_lowercase() == wanted);
        match &found {
            Some(user) => tracing::info!(email, name = %user.name, "user found"),
            None => tracing::info!(email, "no user with this email"),
        }
        Ok(found)
    }
}
