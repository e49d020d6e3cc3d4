//! Entity store mapping drive identifiers to cached details
//!
//! Every entry is the most recent snapshot this process accepted for an
//! identifier. It is a hypothesis about the remote tree, never a proof.

mod error;
mod file;

pub use error::{CacheError, CacheResult};
pub use file::{default_cache_path, CACHE_VERSION};

use std::collections::BTreeMap;

use tracing::debug;

use crate::path::NormalizedPath;
use crate::types::{Details, DriveId};

/// Cached details split by presence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub found: Vec<Details>,
    pub missing: Vec<DriveId>,
}

/// A chain of cached details walked from a root along a path
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPath {
    /// Root followed by every cached folder matched by a path segment
    pub hierarchy: Vec<Details>,
    /// Segments that could not be followed through cached details
    pub rest: Vec<String>,
}

impl CachedPath {
    /// Number of path segments consumed by the walk
    pub fn depth(&self) -> usize {
        self.hierarchy.len().saturating_sub(1)
    }

    pub fn is_complete(&self) -> bool {
        self.rest.is_empty()
    }
}

/// In-memory store of details keyed by identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupCache {
    by_drivewsid: BTreeMap<DriveId, Details>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_drivewsid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_drivewsid.is_empty()
    }

    pub fn contains(&self, drivewsid: &DriveId) -> bool {
        self.by_drivewsid.contains_key(drivewsid)
    }

    pub fn get(&self, drivewsid: &DriveId) -> Option<&Details> {
        self.by_drivewsid.get(drivewsid)
    }

    pub fn ids(&self) -> impl Iterator<Item = &DriveId> {
        self.by_drivewsid.keys()
    }

    /// Split identifiers into cached details and missing identifiers
    pub fn get_many(&self, drivewsids: &[DriveId]) -> Partition {
        let mut partition = Partition::default();

        for id in drivewsids {
            match self.get(id) {
                Some(details) => partition.found.push(details.clone()),
                None => partition.missing.push(id.clone()),
            }
        }

        partition
    }

    /// Store details, replacing any cached listing for the same identifier
    pub fn put(&mut self, details: Details) {
        self.by_drivewsid.insert(details.drivewsid().clone(), details);
    }

    pub fn put_many(&mut self, details: impl IntoIterator<Item = Details>) {
        for d in details {
            self.put(d);
        }
    }

    /// Remove identifiers; absent identifiers are ignored
    pub fn remove_by_ids(&mut self, drivewsids: &[DriveId]) {
        for id in drivewsids {
            if self.by_drivewsid.remove(id).is_some() {
                debug!("cache: removed {}", id);
            }
        }
    }

    /// Take every entry of `other`, its snapshots winning over ours
    pub fn merge(&mut self, other: LookupCache) {
        self.by_drivewsid.extend(other.by_drivewsid);
    }

    pub fn get_root(&self) -> CacheResult<&Details> {
        match self.get(&DriveId::root()) {
            Some(details @ Details::Root(_)) => Ok(details),
            _ => Err(CacheError::RootNotCached),
        }
    }

    pub fn get_trash(&self) -> CacheResult<&Details> {
        match self.get(&DriveId::trash()) {
            Some(details @ Details::TrashRoot(_)) => Ok(details),
            _ => Err(CacheError::TrashNotCached),
        }
    }

    /// Walk the cached chain for `path` starting at `root`
    pub fn path_candidate(&self, root: &Details, path: &NormalizedPath) -> CachedPath {
        walk_cached(root, path.segments(), |id| self.get(id))
    }
}

/// Follow `segments` from `root` through children listings while the matched
/// child is folder-like and its details are available from `lookup`
pub fn walk_cached<'c, F>(root: &Details, segments: &[String], lookup: F) -> CachedPath
where
    F: Fn(&DriveId) -> Option<&'c Details>,
{
    let mut hierarchy = vec![root.clone()];

    for (depth, segment) in segments.iter().enumerate() {
        let parent = &hierarchy[hierarchy.len() - 1];

        let next = parent
            .find_child(segment)
            .filter(|child| child.is_folder_like())
            .and_then(|child| lookup(child.drivewsid()));

        match next {
            Some(details) => hierarchy.push(details.clone()),
            None => {
                return CachedPath {
                    hierarchy,
                    rest: segments[depth..].to_vec(),
                }
            }
        }
    }

    CachedPath {
        hierarchy,
        rest: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChildItem, FolderDetails, ItemRef};

    fn item(id: &str, name: &str) -> ItemRef {
        ItemRef {
            drivewsid: DriveId::new(id),
            docwsid: String::new(),
            zone: String::new(),
            name: name.to_string(),
            extension: None,
            etag: "e".to_string(),
            size: None,
            date_modified: None,
        }
    }

    fn folder(id: &str, name: &str, items: Vec<ChildItem>) -> Details {
        Details::Folder(FolderDetails {
            drivewsid: DriveId::new(id),
            name: name.to_string(),
            extension: None,
            etag: "e".to_string(),
            parent_id: None,
            items,
        })
    }

    fn root(items: Vec<ChildItem>) -> Details {
        Details::Root(FolderDetails {
            drivewsid: DriveId::root(),
            name: String::new(),
            extension: None,
            etag: "r".to_string(),
            parent_id: None,
            items,
        })
    }

    #[test]
    fn test_get_many_partitions() {
        let mut cache = LookupCache::new();
        cache.put(folder("FOLDER::a", "a", vec![]));

        let partition = cache.get_many(&[DriveId::new("FOLDER::a"), DriveId::new("FOLDER::b")]);

        assert_eq!(partition.found.len(), 1);
        assert_eq!(partition.missing, vec![DriveId::new("FOLDER::b")]);
    }

    #[test]
    fn test_put_replaces_listing() {
        let mut cache = LookupCache::new();
        cache.put(root(vec![ChildItem::Folder(item("FOLDER::a", "a"))]));
        cache.put(folder("FOLDER::a", "a", vec![]));
        cache.put(folder("FOLDER::b", "b", vec![]));

        cache.put(root(vec![ChildItem::Folder(item("FOLDER::b", "b"))]));

        let root = cache.get_root().unwrap().clone();
        let first = cache.path_candidate(&root, &NormalizedPath::new("/a"));
        let second = cache.path_candidate(&root, &NormalizedPath::new("/b"));

        assert_eq!(first.depth(), 0);
        assert_eq!(first.rest, vec!["a".to_string()]);
        assert!(second.is_complete());
        assert_eq!(second.depth(), 1);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cache = LookupCache::new();
        cache.put(folder("FOLDER::a", "a", vec![]));

        cache.put(folder("FOLDER::b", "b", vec![]));

        cache.remove_by_ids(&[DriveId::new("FOLDER::zzz"), DriveId::new("FOLDER::b")]);
        cache.remove_by_ids(&[DriveId::new("FOLDER::b")]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ids().collect::<Vec<_>>(), vec![&DriveId::new("FOLDER::a")]);
    }

    #[test]
    fn test_root_not_cached() {
        let cache = LookupCache::new();
        assert!(matches!(cache.get_root(), Err(CacheError::RootNotCached)));
        assert!(matches!(cache.get_trash(), Err(CacheError::TrashNotCached)));
    }

    #[test]
    fn test_candidate_stops_at_file_and_uncached_folder() {
        let mut cache = LookupCache::new();
        cache.put(root(vec![
            ChildItem::Folder(item("FOLDER::docs", "docs")),
            ChildItem::Folder(item("FOLDER::misc", "misc")),
        ]));
        cache.put(folder(
            "FOLDER::docs",
            "docs",
            vec![ChildItem::File(item("FILE::note", "note.md"))],
        ));

        let root = cache.get_root().unwrap().clone();

        let to_file = cache.path_candidate(&root, &NormalizedPath::new("/docs/note.md"));
        assert_eq!(to_file.depth(), 1);
        assert_eq!(to_file.rest, vec!["note.md".to_string()]);

        let uncached = cache.path_candidate(&root, &NormalizedPath::new("/misc/x"));
        assert_eq!(uncached.depth(), 0);
        assert_eq!(uncached.rest, vec!["misc".to_string(), "x".to_string()]);
    }
}
