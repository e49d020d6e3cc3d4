//! Cache persistence as JSON

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CacheError, CacheResult};
use super::LookupCache;
use crate::types::{Details, DriveId};

/// Version of the cache file format
pub const CACHE_VERSION: u32 = 1;

/// On-disk shape of the cache
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<DriveId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trash: Option<DriveId>,
    by_drivewsid: BTreeMap<DriveId, Details>,
}

impl LookupCache {
    /// Decode a cache from its JSON representation
    pub fn from_json(content: &str) -> CacheResult<Self> {
        let file: CacheFile = serde_json::from_str(content)?;

        if file.version != CACHE_VERSION {
            return Err(CacheError::VersionMismatch {
                found: file.version,
                expected: CACHE_VERSION,
            });
        }

        Ok(Self {
            by_drivewsid: file.by_drivewsid,
        })
    }

    /// Encode the cache as JSON
    pub fn to_json(&self) -> CacheResult<String> {
        let file = CacheFile {
            version: CACHE_VERSION,
            root: self.get_root().ok().map(|d| d.drivewsid().clone()),
            trash: self.get_trash().ok().map(|d| d.drivewsid().clone()),
            by_drivewsid: self.by_drivewsid.clone(),
        };

        Ok(serde_json::to_string(&file)?)
    }

    /// Load cache from disk
    pub fn load(path: &Path) -> CacheResult<Self> {
        if !path.exists() {
            return Err(CacheError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let cache = Self::from_json(&content)?;

        debug!("loaded cache from {}: {} items", path.display(), cache.len());

        Ok(cache)
    }

    /// Save cache to disk
    pub fn save(&self, path: &Path) -> CacheResult<()> {
        let content = self.to_json()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;

        debug!("saved cache to {}: {} items", path.display(), self.len());

        Ok(())
    }
}

/// Default location of the cache file
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("~/.cache"))
        .join("idrive")
        .join("cache.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChildItem, FolderDetails, ItemRef};
    use tempfile::tempdir;

    fn sample() -> LookupCache {
        let mut cache = LookupCache::new();
        cache.put(Details::Root(FolderDetails {
            drivewsid: DriveId::root(),
            name: String::new(),
            extension: None,
            etag: "r1".to_string(),
            parent_id: None,
            items: vec![ChildItem::File(ItemRef {
                drivewsid: DriveId::new("FILE::a"),
                docwsid: "a".to_string(),
                zone: "com.apple.CloudDocs".to_string(),
                name: "a".to_string(),
                extension: Some("txt".to_string()),
                etag: "e1".to_string(),
                size: Some(12),
                date_modified: None,
            })],
        }));
        cache
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert_eq!(json["version"], CACHE_VERSION);
        assert_eq!(json["root"], DriveId::root().as_str());
        assert!(json.get("trash").is_none());

        let root = &json["byDrivewsid"][DriveId::root().as_str()];
        assert_eq!(root["type"], "root");
        assert_eq!(root["items"][0]["type"], "file");
    }

    #[test]
    fn test_save_and_load() -> CacheResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("cache.json");

        let cache = sample();
        cache.save(&path)?;

        assert_eq!(LookupCache::load(&path)?, cache);
        Ok(())
    }

    #[test]
    fn test_load_corrupt_file() -> CacheResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json")?;

        assert!(matches!(LookupCache::load(&path), Err(CacheError::Decoding(_))));
        Ok(())
    }

    #[test]
    fn test_other_version_is_rejected() -> CacheResult<()> {
        let mut json: serde_json::Value = serde_json::from_str(&sample().to_json()?)?;
        json["version"] = serde_json::json!(CACHE_VERSION + 1);

        let result = LookupCache::from_json(&json.to_string());
        assert!(matches!(
            result,
            Err(CacheError::VersionMismatch { found, expected }) if found == CACHE_VERSION + 1 && expected == CACHE_VERSION
        ));
        Ok(())
    }

    #[test]
    fn test_load_absent_file() {
        let dir = tempdir().unwrap();
        let result = LookupCache::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }
}
