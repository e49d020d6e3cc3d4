//! Error types for the lookup cache

use std::io;
use thiserror::Error;

use crate::types::DriveId;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while reading, writing or querying the cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache file does not exist
    #[error("Cache file not found: {0}")]
    NotFound(String),

    /// Drive root details have not been fetched yet
    #[error("Drive root is not cached")]
    RootNotCached,

    /// Trash root details have not been fetched yet
    #[error("Trash root is not cached")]
    TrashNotCached,

    /// Details are not cached and the remote may not be asked
    #[error("Not in cache: {}", join_ids(.0))]
    Missing(Vec<DriveId>),

    /// Cache file was written in another format version
    #[error("Cache format version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    /// Cache file does not match the expected shape
    #[error("Cache decoding error: {0}")]
    Decoding(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn join_ids(ids: &[DriveId]) -> String {
    ids.iter()
        .map(DriveId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
