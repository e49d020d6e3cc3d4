/*!
 * Integration test: resolve through the public API, persist the cache and
 * resolve again from the reloaded file
 */

use std::cell::Cell;

use idrive::api::{ApiResult, CreatedFolder, ItemEtag, MaybeDetails, MovedItem, RenameItem};
use idrive::cache::CacheError;
use idrive::types::FolderDetails;
use idrive::{
    ApiUsage, ChildItem, Details, DriveApi, DriveId, GetByPathResult, ItemRef, Lookup, LookupCache,
    NormalizedPath, RootKind,
};
use tempfile::tempdir;

/// Read-only drive with `/photos/2023/beach.jpg`
struct StaticDrive {
    calls: Cell<usize>,
}

fn item(id: &str, name: &str, extension: Option<&str>) -> ItemRef {
    ItemRef {
        drivewsid: DriveId::new(id),
        docwsid: id.rsplit("::").next().unwrap_or_default().to_string(),
        zone: "com.apple.CloudDocs".to_string(),
        name: name.to_string(),
        extension: extension.map(str::to_string),
        etag: "1".to_string(),
        size: Some(1024),
        date_modified: None,
    }
}

fn folder(id: &str, name: &str, items: Vec<ChildItem>) -> FolderDetails {
    FolderDetails {
        drivewsid: DriveId::new(id),
        name: name.to_string(),
        extension: None,
        etag: "1".to_string(),
        parent_id: None,
        items,
    }
}

impl StaticDrive {
    fn details(&self, id: &DriveId) -> Option<Details> {
        match id.as_str() {
            "FOLDER::com.apple.CloudDocs::root" => Some(Details::Root(folder(
                id.as_str(),
                "",
                vec![ChildItem::Folder(item("FOLDER::com.apple.CloudDocs::P", "photos", None))],
            ))),
            "FOLDER::com.apple.CloudDocs::P" => Some(Details::Folder(folder(
                id.as_str(),
                "photos",
                vec![ChildItem::Folder(item("FOLDER::com.apple.CloudDocs::Y", "2023", None))],
            ))),
            "FOLDER::com.apple.CloudDocs::Y" => Some(Details::Folder(folder(
                id.as_str(),
                "2023",
                vec![ChildItem::File(item("FILE::com.apple.CloudDocs::B", "beach", Some("jpg")))],
            ))),
            _ => None,
        }
    }
}

impl DriveApi for StaticDrive {
    fn retrieve_item_details_in_folders(&self, drivewsids: &[DriveId]) -> ApiResult<Vec<MaybeDetails>> {
        self.calls.set(self.calls.get() + 1);
        Ok(drivewsids
            .iter()
            .map(|id| match self.details(id) {
                Some(details) => MaybeDetails::Found(details),
                None => MaybeDetails::InvalidId,
            })
            .collect())
    }

    fn create_folders(&self, _parent: &DriveId, _names: &[String]) -> ApiResult<Vec<CreatedFolder>> {
        unimplemented!("read-only drive")
    }

    fn move_items_to_trash(&self, _items: &[ItemEtag], _permanent: bool) -> ApiResult<Vec<DriveId>> {
        unimplemented!("read-only drive")
    }

    fn rename_items(&self, _items: &[RenameItem]) -> ApiResult<Vec<ChildItem>> {
        unimplemented!("read-only drive")
    }

    fn move_items(&self, _destination: &DriveId, _items: &[ItemEtag]) -> ApiResult<Vec<MovedItem>> {
        unimplemented!("read-only drive")
    }
}

#[test]
fn test_cache_survives_restart() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("idrive").join("cache.json");
    let target = NormalizedPath::new("/photos/2023/beach.jpg");

    let drive = StaticDrive { calls: Cell::new(0) };

    let cache = match LookupCache::load(&cache_path) {
        Err(CacheError::NotFound(_)) => LookupCache::new(),
        other => panic!("expected absent cache, got {:?}", other),
    };

    let mut lookup = Lookup::new(&drive, cache, ApiUsage::Validate);
    let first = lookup.get_by_path(RootKind::Drive, &target).unwrap();
    assert!(first.is_valid());
    assert_eq!(drive.calls.get(), 3);

    lookup.into_cache().save(&cache_path).unwrap();

    let reloaded = LookupCache::load(&cache_path).unwrap();
    assert_eq!(reloaded.len(), 3);

    let mut lookup = Lookup::new(&drive, reloaded, ApiUsage::Fallback);
    let second = lookup.get_by_path(RootKind::Drive, &target).unwrap();
    assert_eq!(drive.calls.get(), 3);

    match second {
        GetByPathResult::Valid {
            hierarchy,
            file: Some(file),
        } => {
            assert_eq!(hierarchy.path().to_string(), "/photos/2023");
            assert_eq!(file.file_name(), "beach.jpg");
        }
        other => panic!("expected a valid file, got {:?}", other),
    }
}

#[test]
fn test_validate_rechecks_reloaded_cache() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let drive = StaticDrive { calls: Cell::new(0) };

    let mut lookup = Lookup::new(&drive, LookupCache::new(), ApiUsage::Validate);
    lookup
        .get_by_path(RootKind::Drive, &NormalizedPath::new("/photos/2023"))
        .unwrap();
    lookup.into_cache().save(&cache_path).unwrap();
    let before = drive.calls.get();

    let mut lookup = Lookup::new(&drive, LookupCache::load(&cache_path).unwrap(), ApiUsage::Validate);
    let result = lookup
        .get_by_path(RootKind::Drive, &NormalizedPath::new("/photos/2023/missing.txt"))
        .unwrap();

    // one validation call covers the whole cached chain
    assert_eq!(drive.calls.get(), before + 1);
    match result {
        GetByPathResult::Invalid { validated, rest, .. } => {
            assert_eq!(validated.depth(), 2);
            assert_eq!(rest, vec!["missing.txt".to_string()]);
        }
        other => panic!("expected an invalid path, got {:?}", other),
    }
}

#[test]
fn test_corrupt_cache_file_is_typed() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    std::fs::write(&cache_path, "[1, 2").unwrap();

    assert!(matches!(LookupCache::load(&cache_path), Err(CacheError::Decoding(_))));
}
