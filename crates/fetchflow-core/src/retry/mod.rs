//! Retry driver and backoff policy.
//!
//! The policy is a pure function of the attempt number; the driver owns the
//! attempt counter and the last error for the duration of one call.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, run_with_retry_when};
