//! JSON shapes of the `drivews` web service

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::{CreatedFolder, ItemEtag, MaybeDetails, MovedItem, RenameItem};
use crate::types::{ChildItem, Details, DriveId, FolderDetails, ItemKind, ItemRef};

const STATUS_INVALID_ID: &str = "ID_INVALID";

/// A children item as returned by the service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItem {
    drivewsid: String,
    #[serde(default)]
    docwsid: String,
    #[serde(default)]
    zone: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    extension: Option<String>,
    #[serde(default)]
    etag: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    date_modified: Option<DateTime<Utc>>,
}

impl WireItem {
    pub fn into_child(self) -> ApiResult<ChildItem> {
        let kind = ItemKind::from_str(&self.kind)
            .map_err(|_| ApiError::Decoding(format!("unknown item type: {}", self.kind)))?;

        let item = ItemRef {
            drivewsid: DriveId::new(self.drivewsid),
            docwsid: self.docwsid,
            zone: self.zone,
            name: self.name,
            extension: self.extension.filter(|ext| !ext.is_empty()),
            etag: self.etag,
            size: self.size,
            date_modified: self.date_modified,
        };

        Ok(ChildItem::from_kind(kind, item))
    }
}

/// One entry of a `retrieveItemDetailsInFolders` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDetails {
    drivewsid: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    extension: Option<String>,
    #[serde(default)]
    etag: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    items: Option<Vec<WireItem>>,
}

impl WireDetails {
    pub fn into_details(self) -> ApiResult<MaybeDetails> {
        if self.status.as_deref() == Some(STATUS_INVALID_ID) {
            return Ok(MaybeDetails::InvalidId);
        }

        let drivewsid = self
            .drivewsid
            .map(DriveId::new)
            .ok_or_else(|| ApiError::Decoding("details without drivewsid".to_string()))?;

        let items = self
            .items
            .ok_or_else(|| ApiError::Decoding(format!("details without items: {}", drivewsid)))?
            .into_iter()
            .map(WireItem::into_child)
            .collect::<ApiResult<Vec<_>>>()?;

        let folder = FolderDetails {
            drivewsid: drivewsid.clone(),
            name: self.name.unwrap_or_default(),
            extension: self.extension.filter(|ext| !ext.is_empty()),
            etag: self.etag.unwrap_or_default(),
            parent_id: self.parent_id.map(DriveId::new),
            items,
        };

        let details = if drivewsid.is_root() {
            Details::Root(folder)
        } else if drivewsid.is_trash() {
            Details::TrashRoot(folder)
        } else {
            match self.kind.as_deref().map(ItemKind::from_str) {
                Some(Ok(ItemKind::Folder)) => Details::Folder(folder),
                Some(Ok(ItemKind::AppLibrary)) => Details::AppLibrary(folder),
                other => {
                    return Err(ApiError::Decoding(format!(
                        "unexpected details type for {}: {:?}",
                        drivewsid,
                        other.and_then(Result::ok)
                    )))
                }
            }
        };

        Ok(MaybeDetails::Found(details))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveDetailsRequest<'a> {
    drivewsid: &'a str,
    partial_data: bool,
    include_hierarchy: bool,
}

impl<'a> RetrieveDetailsRequest<'a> {
    pub fn new(drivewsid: &'a DriveId) -> Self {
        Self {
            drivewsid: drivewsid.as_str(),
            partial_data: false,
            include_hierarchy: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoldersRequest<'a> {
    destination_drivews_id: &'a str,
    folders: Vec<NewFolder<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFolder<'a> {
    name: &'a str,
    client_id: &'a str,
}

impl<'a> CreateFoldersRequest<'a> {
    pub fn new(parent: &'a DriveId, names: &'a [String]) -> Self {
        Self {
            destination_drivews_id: parent.as_str(),
            folders: names
                .iter()
                .map(|name| NewFolder {
                    name,
                    client_id: name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireCreatedFolder {
    Folder(WireItem),
    Unknown {
        #[serde(rename = "clientId")]
        client_id: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct CreateFoldersResponse {
    folders: Vec<WireCreatedFolder>,
}

impl CreateFoldersResponse {
    pub fn into_folders(self) -> ApiResult<Vec<CreatedFolder>> {
        self.folders
            .into_iter()
            .map(|folder| match folder {
                WireCreatedFolder::Folder(item) => Ok(CreatedFolder::Created(item.into_child()?.into_item())),
                WireCreatedFolder::Unknown { client_id } => Ok(CreatedFolder::Unknown { client_id }),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireItemEtag<'a> {
    drivewsid: &'a str,
    client_id: &'a str,
    etag: &'a str,
}

impl<'a> From<&'a ItemEtag> for WireItemEtag<'a> {
    fn from(item: &'a ItemEtag) -> Self {
        Self {
            drivewsid: item.drivewsid.as_str(),
            client_id: item.drivewsid.as_str(),
            etag: &item.etag,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrashRequest<'a> {
    items: Vec<WireItemEtag<'a>>,
}

impl<'a> TrashRequest<'a> {
    pub fn new(items: &'a [ItemEtag]) -> Self {
        Self {
            items: items.iter().map(WireItemEtag::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireId {
    drivewsid: String,
    #[serde(default)]
    etag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrashResponse {
    items: Vec<WireId>,
}

impl TrashResponse {
    pub fn into_ids(self) -> Vec<DriveId> {
        self.items
            .into_iter()
            .map(|item| DriveId::new(item.drivewsid))
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest<'a> {
    destination_drivews_id: &'a str,
    items: Vec<WireItemEtag<'a>>,
}

impl<'a> MoveRequest<'a> {
    pub fn new(destination: &'a DriveId, items: &'a [ItemEtag]) -> Self {
        Self {
            destination_drivews_id: destination.as_str(),
            items: items.iter().map(WireItemEtag::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveResponse {
    items: Vec<WireId>,
}

impl MoveResponse {
    pub fn into_moved(self) -> Vec<MovedItem> {
        self.items
            .into_iter()
            .map(|item| MovedItem {
                drivewsid: DriveId::new(item.drivewsid),
                etag: item.etag.unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RenameRequest<'a> {
    items: Vec<WireRenameItem<'a>>,
}

#[derive(Debug, Serialize)]
struct WireRenameItem<'a> {
    drivewsid: &'a str,
    etag: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extension: Option<&'a str>,
}

impl<'a> RenameRequest<'a> {
    pub fn new(items: &'a [RenameItem]) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| WireRenameItem {
                    drivewsid: item.drivewsid.as_str(),
                    etag: &item.etag,
                    name: &item.name,
                    extension: item.extension.as_deref(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameResponse {
    items: Vec<WireItem>,
}

impl RenameResponse {
    pub fn into_children(self) -> ApiResult<Vec<ChildItem>> {
        self.items.into_iter().map(WireItem::into_child).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> ApiResult<MaybeDetails> {
        serde_json::from_value::<WireDetails>(value)?.into_details()
    }

    #[test]
    fn test_decode_root_details() {
        let details = decode(json!({
            "drivewsid": "FOLDER::com.apple.CloudDocs::root",
            "docwsid": "root",
            "zone": "com.apple.CloudDocs",
            "name": "",
            "etag": "4a",
            "type": "FOLDER",
            "items": [
                {
                    "drivewsid": "FOLDER::com.apple.CloudDocs::F1",
                    "docwsid": "F1",
                    "zone": "com.apple.CloudDocs",
                    "name": "docs",
                    "etag": "e1",
                    "type": "FOLDER"
                },
                {
                    "drivewsid": "FILE::com.apple.CloudDocs::FI1",
                    "docwsid": "FI1",
                    "zone": "com.apple.CloudDocs",
                    "name": "note",
                    "extension": "md",
                    "etag": "e2",
                    "type": "FILE",
                    "size": 42,
                    "dateModified": "2021-08-05T11:19:21Z"
                }
            ]
        }))
        .unwrap();

        let MaybeDetails::Found(Details::Root(root)) = details else {
            panic!("expected root details, got {:?}", details);
        };
        assert_eq!(root.items.len(), 2);
        assert!(root.items[1].is_file());
        assert_eq!(root.items[1].file_name(), "note.md");
        assert_eq!(root.items[1].item().size, Some(42));
    }

    #[test]
    fn test_decode_trash_and_invalid() {
        let trash = decode(json!({"drivewsid": "TRASH_ROOT", "items": [], "numberOfItems": 0})).unwrap();
        assert!(matches!(trash, MaybeDetails::Found(Details::TrashRoot(_))));

        let invalid = decode(json!({"drivewsid": "FOLDER::x::y", "status": "ID_INVALID"})).unwrap();
        assert_eq!(invalid, MaybeDetails::InvalidId);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let result = decode(json!({
            "drivewsid": "FOLDER::x::y",
            "name": "y",
            "type": "FILE",
            "items": []
        }));
        assert!(matches!(result, Err(ApiError::Decoding(_))));
    }

    #[test]
    fn test_create_folders_response_with_unknown() {
        let response: CreateFoldersResponse = serde_json::from_value(json!({
            "destinationDrivewsId": "FOLDER::x::root",
            "folders": [
                {"drivewsid": "FOLDER::x::n", "docwsid": "n", "name": "new", "etag": "1", "type": "FOLDER"},
                {"status": "UNKNOWN", "clientId": "other"}
            ]
        }))
        .unwrap();

        let folders = response.into_folders().unwrap();
        assert!(matches!(&folders[0], CreatedFolder::Created(item) if item.name == "new"));
        assert_eq!(folders[1], CreatedFolder::Unknown { client_id: "other".to_string() });
    }

    #[test]
    fn test_request_bodies() {
        let parent = DriveId::root();
        let names = vec!["a".to_string()];
        let body = serde_json::to_value(CreateFoldersRequest::new(&parent, &names)).unwrap();
        assert_eq!(body["destinationDrivewsId"], parent.as_str());
        assert_eq!(body["folders"][0]["clientId"], "a");

        let items = vec![ItemEtag {
            drivewsid: DriveId::new("FILE::x::1"),
            etag: "e".to_string(),
        }];
        let body = serde_json::to_value(TrashRequest::new(&items)).unwrap();
        assert_eq!(body["items"][0]["clientId"], "FILE::x::1");
        assert_eq!(body["items"][0]["etag"], "e");
    }
}
