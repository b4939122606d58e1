//! An operation that fails at random, used to exercise the retry driver.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::flow::{delay, FlowError};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FlakyError {
    #[error("random failure ({roll:.2})")]
    Failed { roll: f64 },
    #[error("cancelled before completion")]
    Cancelled,
}

/// Simulates a unit of work that fails with probability `failure_rate`.
#[derive(Debug, Clone, Copy)]
pub struct FlakyOperation {
    pub failure_rate: f64,
    pub work: Duration,
}

impl FlakyOperation {
    pub fn new(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
            work: Duration::from_millis(100),
        }
    }

    /// One attempt. Stops early, without rolling, if `token` is cancelled
    /// while the work is in progress.
    pub async fn run(
        &self,
        token: CancellationToken,
    ) -> Result<&'static str, FlowError<FlakyError>> {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("flaky operation cancelled");
                return Err(FlowError::Operation(FlakyError::Cancelled));
            }
            _ = delay(self.work) => {}
        }
        let roll: f64 = rand::random();
        if roll < self.failure_rate {
            Err(FlowError::Operation(FlakyError::Failed { roll }))
        } else {
            Ok("success")
        }
    }
}
