/*!
 * Core types for remote drive entities
 */

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of the drive root
pub const ROOT_DRIVEWSID: &str = "FOLDER::com.apple.CloudDocs::root";

/// Identifier of the trash root
pub const TRASH_DRIVEWSID: &str = "TRASH_ROOT";

/// Opaque, kind-prefixed identifier of a remote node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveId(String);

impl DriveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The drive root identifier
    pub fn root() -> Self {
        Self::new(ROOT_DRIVEWSID)
    }

    /// The trash root identifier
    pub fn trash() -> Self {
        Self::new(TRASH_DRIVEWSID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_DRIVEWSID
    }

    pub fn is_trash(&self) -> bool {
        self.0 == TRASH_DRIVEWSID
    }

    pub fn is_folder(&self) -> bool {
        self.0.starts_with("FOLDER::")
    }

    pub fn is_file(&self) -> bool {
        self.0.starts_with("FILE::")
    }
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DriveId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DriveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which of the two well-known roots a path is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RootKind {
    /// The drive root
    Drive,
    /// The trash root
    Trash,
}

impl RootKind {
    pub fn from_trash_flag(trash: bool) -> Self {
        if trash {
            Self::Trash
        } else {
            Self::Drive
        }
    }

    pub fn drivewsid(&self) -> DriveId {
        match self {
            Self::Drive => DriveId::root(),
            Self::Trash => DriveId::trash(),
        }
    }
}

/// Kind of an item as seen in a parent's listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Folder,
    AppLibrary,
    File,
}

/// Reference to a child as seen in its parent's listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub drivewsid: DriveId,
    #[serde(default)]
    pub docwsid: String,
    #[serde(default)]
    pub zone: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default)]
    pub etag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

impl ItemRef {
    /// Name including the extension, as used in paths
    pub fn file_name(&self) -> String {
        file_name(&self.name, self.extension.as_deref())
    }
}

/// A children item: the lightweight form of a node inside a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChildItem {
    Folder(ItemRef),
    AppLibrary(ItemRef),
    File(ItemRef),
}

impl ChildItem {
    pub fn item(&self) -> &ItemRef {
        match self {
            Self::Folder(item) | Self::AppLibrary(item) | Self::File(item) => item,
        }
    }

    pub fn into_item(self) -> ItemRef {
        match self {
            Self::Folder(item) | Self::AppLibrary(item) | Self::File(item) => item,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Folder(_) => ItemKind::Folder,
            Self::AppLibrary(_) => ItemKind::AppLibrary,
            Self::File(_) => ItemKind::File,
        }
    }

    pub fn drivewsid(&self) -> &DriveId {
        &self.item().drivewsid
    }

    pub fn file_name(&self) -> String {
        self.item().file_name()
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_folder_like(&self) -> bool {
        !self.is_file()
    }

    /// Build a children item from its kind
    pub fn from_kind(kind: ItemKind, item: ItemRef) -> Self {
        match kind {
            ItemKind::Folder => Self::Folder(item),
            ItemKind::AppLibrary => Self::AppLibrary(item),
            ItemKind::File => Self::File(item),
        }
    }
}

/// Content shared by every folder-like details variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDetails {
    pub drivewsid: DriveId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default)]
    pub etag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DriveId>,
    #[serde(default)]
    pub items: Vec<ChildItem>,
}

/// Fully fetched folder-like entity, including its children listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Details {
    Root(FolderDetails),
    TrashRoot(FolderDetails),
    Folder(FolderDetails),
    AppLibrary(FolderDetails),
}

impl Details {
    pub fn folder(&self) -> &FolderDetails {
        match self {
            Self::Root(d) | Self::TrashRoot(d) | Self::Folder(d) | Self::AppLibrary(d) => d,
        }
    }

    pub fn folder_mut(&mut self) -> &mut FolderDetails {
        match self {
            Self::Root(d) | Self::TrashRoot(d) | Self::Folder(d) | Self::AppLibrary(d) => d,
        }
    }

    pub fn drivewsid(&self) -> &DriveId {
        &self.folder().drivewsid
    }

    pub fn etag(&self) -> &str {
        &self.folder().etag
    }

    pub fn items(&self) -> &[ChildItem] {
        &self.folder().items
    }

    pub fn parent_id(&self) -> Option<&DriveId> {
        self.folder().parent_id.as_ref()
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root(_) | Self::TrashRoot(_))
    }

    /// Name as used in paths; roots have an empty name
    pub fn file_name(&self) -> String {
        match self {
            Self::Root(_) | Self::TrashRoot(_) => String::new(),
            Self::Folder(d) | Self::AppLibrary(d) => file_name(&d.name, d.extension.as_deref()),
        }
    }

    /// Find a child in the listing by its file name
    pub fn find_child(&self, name: &str) -> Option<&ChildItem> {
        self.items().iter().find(|item| item.file_name() == name)
    }

    /// Display label used in logs and error messages
    pub fn label(&self) -> String {
        match self {
            Self::Root(_) => "/".to_string(),
            Self::TrashRoot(_) => "TRASH_ROOT".to_string(),
            Self::Folder(_) | Self::AppLibrary(_) => self.file_name(),
        }
    }
}

/// A resolved path target
#[derive(Debug, Clone, PartialEq)]
pub enum DriveItem {
    Folder(Details),
    File(ItemRef),
}

impl DriveItem {
    pub fn drivewsid(&self) -> &DriveId {
        match self {
            Self::Folder(details) => details.drivewsid(),
            Self::File(file) => &file.drivewsid,
        }
    }

    pub fn etag(&self) -> &str {
        match self {
            Self::Folder(details) => details.etag(),
            Self::File(file) => &file.etag,
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Self::Folder(details) => details.file_name(),
            Self::File(file) => file.file_name(),
        }
    }
}

/// Join a name and an optional extension into a file name
pub fn file_name(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", name, ext),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, extension: Option<&str>) -> ItemRef {
        ItemRef {
            drivewsid: DriveId::new(format!("FILE::com.apple.CloudDocs::{}", name)),
            docwsid: String::new(),
            zone: String::new(),
            name: name.to_string(),
            extension: extension.map(str::to_string),
            etag: "1".to_string(),
            size: None,
            date_modified: None,
        }
    }

    #[test]
    fn test_file_name_with_extension() {
        assert_eq!(file("note", Some("md")).file_name(), "note.md");
        assert_eq!(file("Makefile", None).file_name(), "Makefile");
        assert_eq!(file("empty", Some("")).file_name(), "empty");
    }

    #[test]
    fn test_drive_id_kinds() {
        assert!(DriveId::root().is_root());
        assert!(DriveId::root().is_folder());
        assert!(DriveId::trash().is_trash());
        assert!(DriveId::new("FILE::zone::abc").is_file());
    }

    #[test]
    fn test_child_item_serializes_with_type_tag() {
        let item = ChildItem::File(file("note", Some("md")));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["name"], "note");

        let back: ChildItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_item_kind_wire_names() {
        assert_eq!(ItemKind::AppLibrary.to_string(), "APP_LIBRARY");
        assert_eq!("FOLDER".parse::<ItemKind>().unwrap(), ItemKind::Folder);
    }
}
