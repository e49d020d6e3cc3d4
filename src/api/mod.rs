//! Remote drive calls consumed by the lookup engine
//!
//! The engine only depends on the [`DriveApi`] trait; [`HttpDriveApi`] is the
//! implementation talking to the `drivews` web service.

mod error;
mod http;
mod session;
mod wire;

pub use error::{ApiError, ApiResult};
pub use http::HttpDriveApi;
pub use session::{default_session_path, Session};

use crate::types::{ChildItem, Details, DriveId, ItemRef};

/// Per-identifier answer of a details fetch
#[derive(Debug, Clone, PartialEq)]
pub enum MaybeDetails {
    Found(Details),
    InvalidId,
}

/// Per-name answer of a folder creation
#[derive(Debug, Clone, PartialEq)]
pub enum CreatedFolder {
    Created(ItemRef),
    Unknown { client_id: String },
}

/// Identifier with the etag a mutation is conditioned on
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEtag {
    pub drivewsid: DriveId,
    pub etag: String,
}

/// A rename request for one item
#[derive(Debug, Clone, PartialEq)]
pub struct RenameItem {
    pub drivewsid: DriveId,
    pub etag: String,
    pub name: String,
    pub extension: Option<String>,
}

/// An item after a successful move
#[derive(Debug, Clone, PartialEq)]
pub struct MovedItem {
    pub drivewsid: DriveId,
    pub etag: String,
}

/// Remote calls of the drive service
pub trait DriveApi {
    /// Fetch details for every identifier; the answer is aligned with the request
    fn retrieve_item_details_in_folders(&self, drivewsids: &[DriveId])
        -> ApiResult<Vec<MaybeDetails>>;

    /// Create folders named `names` inside `parent`
    fn create_folders(&self, parent: &DriveId, names: &[String]) -> ApiResult<Vec<CreatedFolder>>;

    /// Move items to the trash, or delete them permanently; returns the affected identifiers
    fn move_items_to_trash(&self, items: &[ItemEtag], permanent: bool) -> ApiResult<Vec<DriveId>>;

    /// Rename items; returns their new children items
    fn rename_items(&self, items: &[RenameItem]) -> ApiResult<Vec<ChildItem>>;

    /// Move items into `destination`
    fn move_items(&self, destination: &DriveId, items: &[ItemEtag]) -> ApiResult<Vec<MovedItem>>;
}
