/*!
 * idrive - path-based client for iCloud Drive
 *
 * The drive only addresses nodes by identifier. This library resolves
 * slash-separated paths into identifiers through a local cache of folder
 * listings, re-validating cached chains against the drive before trusting
 * them, and batching every remote lookup it can.
 */

pub mod actions;
pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod path;
pub mod prompt;
pub mod report;
pub mod types;


// Re-export main components for easier access
pub use api::{DriveApi, HttpDriveApi, Session};
pub use cache::LookupCache;
pub use config::Config;
pub use error::{DriveError, Result};
pub use lookup::{ApiUsage, GetByPathResult, Lookup, PathError};
pub use path::NormalizedPath;
pub use types::{ChildItem, Details, DriveId, DriveItem, ItemRef, RootKind};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
