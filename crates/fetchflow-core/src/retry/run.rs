//! Retry loop: run an operation factory until success or the budget is spent.

use std::fmt;
use std::future::Future;

use crate::flow::{delay, FlowError};

use super::policy::{RetryDecision, RetryPolicy};

/// Invokes `op` until an attempt succeeds or the policy says stop.
///
/// Every call to `op` must start a fresh attempt. Attempts are strictly
/// sequential: attempt `n + 1` starts only after attempt `n` has failed and
/// its backoff has elapsed. When the budget is spent the final failure is
/// returned inside `FlowError::RetryExhausted`.
pub async fn run_with_retry<Op, Fut, T, E>(
    policy: &RetryPolicy,
    op: Op,
) -> Result<T, FlowError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FlowError<E>>>,
    E: fmt::Display,
{
    run_with_retry_when(policy, op, |_| true).await
}

/// Like [`run_with_retry`], but only failures accepted by `retryable` are
/// retried. Any other failure is returned as is, without consuming the rest
/// of the budget.
pub async fn run_with_retry_when<Op, Fut, T, E, P>(
    policy: &RetryPolicy,
    mut op: Op,
    retryable: P,
) -> Result<T, FlowError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FlowError<E>>>,
    E: fmt::Display,
    P: Fn(&FlowError<E>) -> bool,
{
    let max_attempts = policy.effective_max_attempts();
    let mut attempt = 1u32;
    loop {
        tracing::debug!(attempt, max_attempts, "attempt start");
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, max_attempts, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if !retryable(&e) => {
                tracing::warn!(attempt, error = %e, "attempt failed, not retryable");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "attempt failed");
                match policy.decide(attempt) {
                    RetryDecision::NoRetry => {
                        return Err(FlowError::RetryExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(
                            backoff_ms = d.as_millis() as u64,
                            "waiting before next attempt"
                        );
                        delay(d).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}
