//! Async orchestration primitives: delay, deadline race and fan-out join.
//!
//! The retry driver lives in [`crate::retry`] and is built from these.

mod delay;
mod error;
mod join;
mod timeout;

pub use delay::{delay, delay_ms};
pub use error::FlowError;
pub use join::fan_out;
pub use timeout::{lift, with_timeout, with_timeout_cancellable};
