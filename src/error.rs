//! Global error handling for idrive
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use thiserror::Error;

use crate::api::ApiError;
use crate::cache::CacheError;
use crate::lookup::PathError;

/// Global error type for idrive operations
#[derive(Error, Debug)]
pub enum DriveError {
    /// Remote drive errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// A path did not resolve to what the command needs
    #[error("{0}")]
    Path(#[from] PathError),

    /// An identifier was reported invalid by the drive
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user declined a confirmation prompt
    #[error("Operation cancelled")]
    ConfirmationDeclined,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for idrive operations
pub type Result<T> = std::result::Result<T, DriveError>;

/// Creates a DriveError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DriveError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            DriveError::Unexpected(format!("{}: {}", context, e))
        })
    }
}
