//! Path resolution causes

use thiserror::Error;

/// Why a path does not lead to an existing node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// No child with this name in the deepest valid folder
    #[error("{name} was not found in {parent}")]
    NotFound { name: String, parent: String },

    /// A file was met where a folder is required
    #[error("{name} is not a folder")]
    NotAFolder { name: String },

    /// A folder was met where a file is required
    #[error("{path} is not a file")]
    NotAFile { path: String },
}
