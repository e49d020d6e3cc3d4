//! Path lookup engine
//!
//! Resolves slash-separated paths into drive identifiers using the cache as a
//! source of hypotheses. Depending on the [`ApiUsage`] policy, cached chains
//! are re-validated against freshly fetched details before they are trusted.
//!
//! All state is held by [`Lookup`] and threaded through every step by `&mut`.

mod error;
mod fetch;
mod hierarchy;
mod resolve;
mod temp;
mod tree;
mod validate;

pub use error::PathError;
pub use hierarchy::{GetByPathResult, Hierarchy};
pub use temp::TempCache;
pub use tree::FolderTree;
pub use validate::{StaleReason, StaleReference};

use clap::ValueEnum;
use strum::Display;

use crate::api::DriveApi;
use crate::cache::LookupCache;
use crate::types::{ChildItem, Details, DriveId};

/// Which cached data the fetcher is allowed to trust
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ApiUsage {
    /// Re-validate cached chains against the remote
    #[default]
    Validate,
    /// Trust the cache; only fetch what is absent
    Fallback,
    /// Never call the remote
    OnlyCache,
}

impl ApiUsage {
    fn trusts_cache(self) -> bool {
        !matches!(self, Self::Validate)
    }
}

/// Lookup context: remote access, usage policy, main store and optional overlay
pub struct Lookup<'a> {
    api: &'a dyn DriveApi,
    usage: ApiUsage,
    cache: LookupCache,
    temp: Option<TempCache>,
}

impl<'a> Lookup<'a> {
    pub fn new(api: &'a dyn DriveApi, cache: LookupCache, usage: ApiUsage) -> Self {
        Self {
            api,
            usage,
            cache,
            temp: None,
        }
    }

    pub fn usage(&self) -> ApiUsage {
        self.usage
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub fn into_cache(self) -> LookupCache {
        self.cache
    }

    /// Remote access for mutations; their results are fed back with
    /// [`Lookup::retrieve_details_fresh`] and [`Lookup::purge`]
    pub fn api(&self) -> &'a dyn DriveApi {
        self.api
    }

    pub fn is_temp_active(&self) -> bool {
        self.temp.is_some()
    }

    /// Run `f` with a different usage policy, restoring the previous one after
    pub fn with_usage<T>(&mut self, usage: ApiUsage, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.usage, usage);
        let result = f(self);
        self.usage = previous;
        result
    }

    /// Drop identifiers the drive no longer knows
    pub fn purge(&mut self, drivewsids: &[DriveId]) {
        self.remove_details(drivewsids);
    }

    /// Record a child returned by a mutation in its parent's known listing
    ///
    /// An unknown parent is left alone; the child replaces the entry with the
    /// same identifier, or is appended.
    pub fn update_child(&mut self, parent: &DriveId, child: ChildItem) {
        let Some(mut details) = self.view(parent).cloned() else {
            return;
        };

        let items = &mut details.folder_mut().items;
        match items.iter_mut().find(|item| item.drivewsid() == child.drivewsid()) {
            Some(existing) => *existing = child,
            None => items.push(child),
        }

        self.put_details(details);
    }

    /// Best current knowledge of an identifier: overlay first, then the main store
    pub(crate) fn view(&self, drivewsid: &DriveId) -> Option<&Details> {
        if let Some(temp) = &self.temp {
            if temp.is_missing(drivewsid) {
                return None;
            }
            if let Some(details) = temp.get(drivewsid) {
                return Some(details);
            }
        }

        self.cache.get(drivewsid)
    }

    /// Details the fetcher may answer with without asking the remote
    fn resident(&self, drivewsid: &DriveId) -> Option<&Details> {
        match &self.temp {
            Some(temp) => temp.get(drivewsid).or_else(|| {
                if self.usage.trusts_cache() && !temp.is_missing(drivewsid) {
                    self.cache.get(drivewsid)
                } else {
                    None
                }
            }),
            None => self.cache.get(drivewsid),
        }
    }

    fn known_missing(&self, drivewsid: &DriveId) -> bool {
        self.temp
            .as_ref()
            .map_or(false, |temp| temp.is_missing(drivewsid))
    }

    fn put_details(&mut self, details: Details) {
        match &mut self.temp {
            Some(temp) => temp.put(details),
            None => self.cache.put(details),
        }
    }

    fn remove_details(&mut self, drivewsids: &[DriveId]) {
        match &mut self.temp {
            Some(temp) => temp.remove(drivewsids),
            None => self.cache.remove_by_ids(drivewsids),
        }
    }
}
