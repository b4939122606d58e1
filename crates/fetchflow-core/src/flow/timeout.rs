//! Deadline race: first settlement wins.
//!
//! The deadline is armed when [`with_timeout`] is called, not when the
//! returned future is first polled. If the deadline fires first the wrapped
//! future is dropped. A pure-async operation therefore stops at its next
//! suspension point, but work it already handed off (a blocking HTTP call on
//! the blocking pool, a spawned task) keeps running and its result is
//! discarded. Operations that need to stop that work take a
//! [`CancellationToken`] via [`with_timeout_cancellable`].

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::FlowError;

/// Races `future` against a deadline `duration` from now.
///
/// Returns the future's own result (success or failure) if it settles before
/// the deadline, otherwise `FlowError::Timeout { duration }`. When both are
/// ready on the same poll the deadline wins.
pub fn with_timeout<F, T, E>(
    future: F,
    duration: Duration,
) -> impl Future<Output = Result<T, FlowError<E>>>
where
    F: Future<Output = Result<T, FlowError<E>>>,
{
    let deadline = Instant::now() + duration;
    tracing::debug!(timeout_ms = duration.as_millis() as u64, "deadline armed");
    async move {
        tokio::select! {
            biased;
            _ = tokio::time::sleep_until(deadline) => {
                tracing::warn!(timeout_ms = duration.as_millis() as u64, "operation timed out");
                Err(FlowError::Timeout { duration })
            }
            result = future => result,
        }
    }
}

/// Like [`with_timeout`], but hands the operation a token that is cancelled
/// once the race settles (in particular when the deadline fires), so it can
/// stop background work it started.
///
/// As with [`with_timeout`], `op` is invoked and the deadline armed at call
/// time. Dropping the returned future unpolled also cancels the token.
pub fn with_timeout_cancellable<Op, F, T, E>(
    duration: Duration,
    op: Op,
) -> impl Future<Output = Result<T, FlowError<E>>>
where
    Op: FnOnce(CancellationToken) -> F,
    F: Future<Output = Result<T, FlowError<E>>>,
{
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    let bounded = with_timeout(op(token), duration);
    async move {
        let _guard = guard;
        bounded.await
    }
}

/// Lifts a plain fallible future into the `FlowError` domain so it can be
/// bounded and retried.
pub async fn lift<F, T, E>(future: F) -> Result<T, FlowError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    future.await.map_err(FlowError::Operation)
}
