//! Remote collections: users and posts.
//!
//! The pipeline reaches the service only through [`DataSource`]. Two
//! implementations ship here: [`HttpSource`] for a live REST endpoint and
//! [`MemorySource`] for fixtures and tests.

mod error;
mod fixtures;
mod http;
mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

pub use error::ApiError;
pub use http::HttpSource;
pub use memory::MemorySource;

/// A user record. Fields the service sends beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// A post record ("order" in the original exercise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// Names the accessor operations, e.g. to flag which ones are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessor {
    Users,
    UserById,
    Posts,
    PostsByUser,
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accessor::Users => "users",
            Accessor::UserById => "user_by_id",
            Accessor::Posts => "posts",
            Accessor::PostsByUser => "posts_by_user",
        };
        f.write_str(name)
    }
}

/// Request/response contract with the remote collections.
///
/// Every call starts a fresh request, so calls are safe to repeat.
pub trait DataSource: Send + Sync {
    /// `GET /users`
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    /// `GET /users/{id}`; `Ok(None)` when the user does not exist.
    fn fetch_user_by_id(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<Option<User>, ApiError>> + Send;

    /// `GET /posts`
    fn fetch_posts(&self) -> impl Future<Output = Result<Vec<Post>, ApiError>> + Send;

    /// `GET /posts?userId={user_id}`
    fn fetch_posts_by_user(
        &self,
        user_id: u64,
    ) -> impl Future<Output = Result<Vec<Post>, ApiError>> + Send;
}
