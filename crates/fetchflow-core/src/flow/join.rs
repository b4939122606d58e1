//! Fan-out / join over a set of independent branches.
//!
//! All-or-nothing: the first failing branch fails the whole join and the
//! branches still in flight are aborted.

use std::future::Future;

use tokio::task::{JoinError, JoinSet};

use super::error::FlowError;

/// Runs every branch concurrently on a `JoinSet` and returns their values in
/// input order.
///
/// On the first failure the remaining branches are aborted and that failure
/// is returned. A branch that panics or is cancelled surfaces as an
/// operation error built from the `JoinError`.
///
/// Branches are spawned, so they must own their data. The pipeline's own
/// joins borrow the pipeline and use `tokio::try_join!` instead; this is the
/// entry point for callers with a variable number of owned branches.
pub async fn fan_out<F, T, E>(branches: Vec<F>) -> Result<Vec<T>, FlowError<E>>
where
    F: Future<Output = Result<T, FlowError<E>>> + Send + 'static,
    T: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    let total = branches.len();
    tracing::debug!(branches = total, "fan-out start");

    let mut join_set = JoinSet::new();
    for (index, branch) in branches.into_iter().enumerate() {
        join_set.spawn(async move { (index, branch.await) });
    }

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, Ok(value))) => slots[index] = Some(value),
            Ok((index, Err(e))) => {
                tracing::warn!(branch = index, "fan-out branch failed, aborting the rest");
                join_set.abort_all();
                return Err(e);
            }
            Err(join_err) => {
                join_set.abort_all();
                return Err(FlowError::Operation(E::from(join_err)));
            }
        }
    }

    tracing::debug!(branches = total, "fan-out joined");
    Ok(slots.into_iter().flatten().collect())
}
