//! Fetch pipeline: the calling code that composes the remote accessors with
//! the timeout wrapper, the retry driver and fail-fast joins.
//!
//! Every accessor call is bounded by the request timeout. Accessors listed
//! as unstable are additionally retried, each attempt with its own deadline.
//! Independent calls feeding one view are joined with `tokio::try_join!`:
//! the first failing branch fails the view.

mod error;
mod posts;
mod users;
mod views;

use std::future::Future;
use std::time::Duration;

use crate::api::{Accessor, ApiError, DataSource};
use crate::config::FetchflowConfig;
use crate::flow::{lift, with_timeout, FlowError};
use crate::retry::{run_with_retry_when, RetryPolicy};

pub use error::PipelineError;
pub use views::{PostSummary, PosterCount, PostsStats, UserSummary, UserWithPosts};

/// How accessor calls are bounded and retried.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub unstable: Vec<Accessor>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&FetchflowConfig::default())
    }
}

impl PipelineOptions {
    pub fn from_config(cfg: &FetchflowConfig) -> Self {
        Self {
            request_timeout: cfg.request_timeout(),
            retry: cfg.retry_policy(),
            unstable: cfg.unstable.clone(),
        }
    }
}

/// Aggregate views over a [`DataSource`].
#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
    options: PipelineOptions,
}

impl<S: DataSource> Pipeline<S> {
    pub fn new(source: S, options: PipelineOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs one accessor call under the composition rules.
    ///
    /// `make` starts a fresh request per call so retries never reuse an
    /// attempt.
    async fn call<T, Fut, Mk>(
        &self,
        accessor: Accessor,
        mut make: Mk,
    ) -> Result<T, FlowError<ApiError>>
    where
        Mk: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let timeout = self.options.request_timeout;
        if self.options.unstable.contains(&accessor) {
            tracing::debug!(%accessor, "bounded call with retry");
            run_with_retry_when(
                &self.options.retry,
                || with_timeout(lift(make()), timeout),
                is_retryable,
            )
            .await
        } else {
            tracing::debug!(%accessor, "bounded call");
            with_timeout(lift(make()), timeout).await
        }
    }
}

/// Timeouts and transient service failures are retried; malformed
/// responses are not.
fn is_retryable(e: &FlowError<ApiError>) -> bool {
    match e {
        FlowError::Operation(api) => api.is_transient(),
        FlowError::Timeout { .. } | FlowError::RetryExhausted { .. } => true,
    }
}
