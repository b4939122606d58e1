//! Errors returned by the remote collection accessors.

/// Failure of a single accessor call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u32, url: String },

    /// libcurl failed before a response arrived (DNS, connect, reset, ...).
    #[error("transport failure")]
    Transport(#[from] curl::Error),

    /// Response body was not the JSON we expected.
    #[error("decoding response")]
    Decode(#[from] serde_json::Error),

    #[error("building request URL")]
    Url(#[from] url::ParseError),

    /// The blocking request task panicked or was cancelled.
    #[error("request task failed")]
    Task(#[from] tokio::task::JoinError),

    /// The source refused the call (scripted failure of an in-memory source).
    #[error("{0} unavailable")]
    Unavailable(String),
}

impl ApiError {
    /// True for failures worth retrying: transport errors, 5xx and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            ApiError::Transport(_) | ApiError::Unavailable(_) => true,
            ApiError::Decode(_) | ApiError::Url(_) | ApiError::Task(_) => false,
        }
    }
}
