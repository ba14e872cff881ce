//! Model transport error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while calling the model provider.
///
/// Each variant aborts the current turn; none of them is retried.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("model request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Classify a reqwest failure, separating timeouts from other transport errors.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }
}
