//! Error types for remote drive calls

use std::io;
use thiserror::Error;

/// Result type for remote drive calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the drive service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request failed at the network/HTTP layer
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Drive API returned error status {status}: {body}")]
    Status { status: u16, body: String },

    /// The session is missing or expired
    #[error("Session is not authorized (status {0}); refresh the session file")]
    Unauthorized(u16),

    /// The response did not match the expected shape
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Session file could not be read or written
    #[error("Session error: {0}")]
    Session(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decoding(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decoding(error.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(error: url::ParseError) -> Self {
        ApiError::Session(format!("invalid service url: {}", error))
    }
}
