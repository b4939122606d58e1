//! Shapes returned by the pipeline.

use crate::api::{Post, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        let User {
            id,
            name,
            username,
            email,
        } = user;
        Self {
            id,
            name,
            email,
            username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: u64,
    pub title: String,
    pub body: String,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithPosts {
    pub user: UserSummary,
    pub posts: Vec<PostSummary>,
    pub post_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterCount {
    pub user_id: u64,
    pub user_name: String,
    pub post_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostsStats {
    pub total_posts: usize,
    pub total_users: usize,
    /// Rounded to two decimals; 0 when there are no users.
    pub average_posts_per_user: f64,
    /// `None` only when there are no users.
    pub top_poster: Option<PosterCount>,
    /// Every user with their post count, most active first. Ties keep the
    /// service's user order.
    pub posts_by_user: Vec<PosterCount>,
}
