//! Failure taxonomy shared by the timeout wrapper and the retry driver.

use std::fmt;
use std::time::Duration;

/// Error produced by a bounded or retried operation.
///
/// `E` is the operation's own error type. Timeouts and exhausted retry
/// budgets are reported as distinct variants so callers can tell them apart
/// from the operation failing on its own.
#[derive(Debug)]
pub enum FlowError<E> {
    /// The operation did not settle before the deadline.
    Timeout { duration: Duration },
    /// Every attempt failed. `last` is the failure of the final attempt and
    /// is reported through `source()`, not the message.
    RetryExhausted {
        attempts: u32,
        last: Box<FlowError<E>>,
    },
    /// The operation's own failure, unchanged.
    Operation(E),
}

impl<E: fmt::Display> fmt::Display for FlowError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Timeout { duration } => {
                write!(f, "operation timed out after {}ms", duration.as_millis())
            }
            FlowError::RetryExhausted { attempts, last } => {
                write!(f, "all {} attempts failed", attempts)
            }
            FlowError::Operation(e) => write!(f, "{}", e),
        }
    }
}

impl<E> std::error::Error for FlowError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowError::Timeout { .. } => None,
            FlowError::RetryExhausted { last, .. } => Some(last.as_ref()),
            // Transparent: the operation error stands in for us.
            FlowError::Operation(e) => e.source(),
        }
    }
}

impl<E> FlowError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FlowError::Timeout { .. })
    }

    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, FlowError::RetryExhausted { .. })
    }

    /// Attempt count carried by `RetryExhausted`, if any.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            FlowError::RetryExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// The innermost failure: unwraps `RetryExhausted` down to the last
    /// attempt's error.
    pub fn root(&self) -> &FlowError<E> {
        match self {
            FlowError::RetryExhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// The operation's own error, if the root failure was one.
    pub fn operation_error(&self) -> Option<&E> {
        match self.root() {
            FlowError::Operation(e) => Some(e),
            _ => None,
        }
    }
}
