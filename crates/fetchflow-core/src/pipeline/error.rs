use crate::api::ApiError;
use crate::flow::FlowError;

/// Failure of a pipeline view.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An accessor call failed, timed out or ran out of retries.
    #[error(transparent)]
    Flow(#[from] FlowError<ApiError>),

    #[error("user {0} not found")]
    UserNotFound(u64),
}

impl PipelineError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PipelineError::Flow(e) if e.root().is_timeout())
    }

    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, PipelineError::Flow(e) if e.is_retry_exhausted())
    }
}
