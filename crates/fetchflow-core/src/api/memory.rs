//! In-memory source with scripted latency and failures.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::{fixtures, Accessor, ApiError, DataSource, Post, User};
use crate::flow::delay;

#[derive(Debug, Default)]
struct Script {
    /// Remaining scripted failures per accessor.
    failures: HashMap<Accessor, u32>,
    /// Extra latency per accessor, on top of the source-wide latency.
    latency: HashMap<Accessor, Duration>,
    /// Number of calls seen per accessor.
    calls: HashMap<Accessor, u32>,
}

/// Serves fixed collections from memory.
///
/// Latency is simulated with the pacing delay, so tests running on paused
/// tokio time observe exact virtual durations.
#[derive(Debug, Default)]
pub struct MemorySource {
    users: Vec<User>,
    posts: Vec<Post>,
    latency: Duration,
    script: Mutex<Script>,
}

impl MemorySource {
    pub fn new(users: Vec<User>, posts: Vec<Post>) -> Self {
        Self {
            users,
            posts,
            ..Self::default()
        }
    }

    /// The built-in sample data (10 users, 40 posts).
    pub fn fixtures() -> Self {
        Self::new(fixtures::users(), fixtures::posts())
    }

    /// Latency applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Extra latency for one accessor.
    pub fn with_accessor_latency(self, accessor: Accessor, latency: Duration) -> Self {
        self.script().latency.insert(accessor, latency);
        self
    }

    /// The next `times` calls of `accessor` fail with `ApiError::Unavailable`.
    pub fn fail_next(&self, accessor: Accessor, times: u32) {
        self.script().failures.insert(accessor, times);
    }

    /// Calls observed so far for `accessor`, including failed ones.
    pub fn calls(&self, accessor: Accessor) -> u32 {
        self.script().calls.get(&accessor).copied().unwrap_or(0)
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call, waits out the latency, then applies any scripted
    /// failure.
    async fn enter(&self, accessor: Accessor) -> Result<(), ApiError> {
        let extra = {
            let mut script = self.script();
            *script.calls.entry(accessor).or_insert(0) += 1;
            script.latency.get(&accessor).copied().unwrap_or_default()
        };
        let wait = self.latency + extra;
        if !wait.is_zero() {
            delay(wait).await;
        }
        let mut script = self.script();
        match script.failures.get_mut(&accessor) {
            Some(left) if *left > 0 => {
                *left -= 1;
                tracing::debug!(%accessor, remaining = *left, "scripted failure");
                Err(ApiError::Unavailable(accessor.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl DataSource for MemorySource {
    async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.enter(Accessor::Users).await?;
        Ok(self.users.clone())
    }

    async fn fetch_user_by_id(&self, id: u64) -> Result<Option<User>, ApiError> {
        self.enter(Accessor::UserById).await?;
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.enter(Accessor::Posts).await?;
        Ok(self.posts.clone())
    }

    async fn fetch_posts_by_user(&self, user_id: u64) -> Result<Vec<Post>, ApiError> {
        self.enter(Accessor::PostsByUser).await?;
        Ok(self
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn serves_fixtures() {
        let src = MemorySource::fixtures();
        assert_eq!(src.fetch_users().await.unwrap().len(), 10);
        assert_eq!(src.fetch_posts().await.unwrap().len(), 40);
        assert_eq!(src.fetch_posts_by_user(3).await.unwrap().len(), 6);
        assert!(src.fetch_users().await.is_ok());
        assert_eq!(src.calls(Accessor::Users), 2);
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let src = MemorySource::fixtures();
        assert!(src.fetch_user_by_id(999).await.unwrap().is_none());
        assert_eq!(
            src.fetch_user_by_id(1).await.unwrap().map(|u| u.username),
            Some("Bret".to_string())
        );
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed() {
        let src = MemorySource::fixtures();
        src.fail_next(Accessor::Posts, 2);
        assert!(matches!(
            src.fetch_posts().await,
            Err(ApiError::Unavailable(name)) if name == "posts"
        ));
        assert!(src.fetch_posts().await.is_err());
        assert!(src.fetch_posts().await.is_ok());
        assert_eq!(src.calls(Accessor::Posts), 3);
        // Other accessors are unaffected.
        assert!(src.fetch_users().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_virtual_time() {
        let src = MemorySource::fixtures()
            .with_latency(Duration::from_millis(100))
            .with_accessor_latency(Accessor::Posts, Duration::from_millis(400));
        let start = Instant::now();
        src.fetch_users().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(100));
        src.fetch_posts().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(600));
    }
}
