//! Scoped overlay store

use std::collections::BTreeSet;

use tracing::debug;

use super::Lookup;
use crate::cache::LookupCache;
use crate::error::Result;
use crate::types::{Details, DriveId};

/// Details fetched during one scoped operation, plus the identifiers the
/// remote reported invalid during it
#[derive(Debug, Clone, Default)]
pub struct TempCache {
    cache: LookupCache,
    missing: BTreeSet<DriveId>,
}

impl TempCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, drivewsid: &DriveId) -> Option<&Details> {
        self.cache.get(drivewsid)
    }

    pub fn is_missing(&self, drivewsid: &DriveId) -> bool {
        self.missing.contains(drivewsid)
    }

    pub fn put(&mut self, details: Details) {
        self.missing.remove(details.drivewsid());
        self.cache.put(details);
    }

    pub fn remove(&mut self, drivewsids: &[DriveId]) {
        self.cache.remove_by_ids(drivewsids);
        self.missing.extend(drivewsids.iter().cloned());
    }

    pub fn into_parts(self) -> (LookupCache, Vec<DriveId>) {
        (self.cache, self.missing.into_iter().collect())
    }
}

impl Lookup<'_> {
    /// Run `f` with an overlay store
    ///
    /// Fetches made inside `f` land in the overlay. When the scope ends, on
    /// success or failure, the overlay is merged into the main store and the
    /// identifiers found missing are purged from it. An overlay that is
    /// already active is reused and the inner scope does not merge.
    pub fn with_temp_cache<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.temp.is_some() {
            return f(self);
        }

        self.temp = Some(TempCache::new());
        let result = f(self);

        if let Some(temp) = self.temp.take() {
            let (overlay, missing) = temp.into_parts();
            debug!(
                "temp cache: merging {} details, purging {} missing ids",
                overlay.len(),
                missing.len()
            );
            self.cache.merge(overlay);
            self.cache.remove_by_ids(&missing);
        }

        result
    }
}
