//! Error types for the deployment console

use thiserror::Error;

/// Main error type for the deployment console
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Request rejected or timed out before a response arrived
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Backend answered with an unexpected status
    #[error("Server error: {status} {detail}")]
    ServerError { status: u16, detail: String },

    /// Malformed cell id or unparseable response body
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Invalid cell id: {0}")]
    InvalidCellId(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::DecodeFailure(err.to_string())
        } else {
            ConsoleError::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::DecodeFailure(err.to_string())
    }
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::Internal(err.to_string())
    }
}
