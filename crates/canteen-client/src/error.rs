//! # Backend Error Types
//!
//! Failures crossing the network seam. Everything here is a
//! "transient service" condition from the session's point of view: the
//! operator sees a notice and may re-trigger the action; nothing is
//! retried automatically.

use thiserror::Error;

/// Errors produced by [`crate::Backend`] implementations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed (DNS, connect, timeout, broken pipe).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with `success: false` or a non-2xx status.
    #[error("Server rejected request: {message}")]
    Server { message: String },

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// A successful response omitted a payload the operation requires.
    #[error("Server response missing {what}")]
    MissingData { what: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Convenience type alias for Results with BackendError.
pub type BackendResult<T> = Result<T, BackendError>;
