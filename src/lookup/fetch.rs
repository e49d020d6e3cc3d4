//! Batched details retrieval

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::{ApiUsage, Lookup};
use crate::api::{ApiError, MaybeDetails};
use crate::cache::CacheError;
use crate::error::{DriveError, Result};
use crate::types::{Details, DriveId};

impl Lookup<'_> {
    /// Details for every identifier, answering from resident data where the
    /// usage policy allows and fetching the rest in a single call
    ///
    /// The answer is aligned with `drivewsids`; `None` marks an identifier
    /// the drive reported invalid.
    pub fn retrieve_details(&mut self, drivewsids: &[DriveId]) -> Result<Vec<Option<Details>>> {
        let mut known: HashMap<DriveId, Option<Details>> = HashMap::new();
        let mut pending = Vec::new();
        let mut seen = HashSet::new();

        for id in drivewsids {
            if !seen.insert(id) {
                continue;
            }

            if self.known_missing(id) {
                known.insert(id.clone(), None);
            } else if let Some(details) = self.resident(id) {
                known.insert(id.clone(), Some(details.clone()));
            } else {
                pending.push(id.clone());
            }
        }

        debug!(
            "retrieve details: {} requested, {} resident, {} to fetch",
            drivewsids.len(),
            known.len(),
            pending.len()
        );

        if !pending.is_empty() {
            if self.usage == ApiUsage::OnlyCache {
                return Err(CacheError::Missing(pending).into());
            }

            let fetched = self.fetch_remote(&pending)?;
            known.extend(pending.into_iter().zip(fetched));
        }

        Ok(drivewsids
            .iter()
            .map(|id| known.get(id).cloned().flatten())
            .collect())
    }

    /// Like [`Lookup::retrieve_details`], failing if any identifier is invalid
    pub fn retrieve_details_strict(&mut self, drivewsids: &[DriveId]) -> Result<Vec<Details>> {
        let details = self.retrieve_details(drivewsids)?;

        drivewsids
            .iter()
            .zip(details)
            .map(|(id, details)| {
                details.ok_or_else(|| DriveError::NotFound(format!("invalid drivewsid: {}", id)))
            })
            .collect()
    }

    /// Ask the remote for every identifier regardless of what is cached
    pub fn retrieve_details_fresh(&mut self, drivewsids: &[DriveId]) -> Result<Vec<Option<Details>>> {
        let mut unique = Vec::new();
        let mut seen = HashSet::new();
        for id in drivewsids {
            if seen.insert(id) {
                unique.push(id.clone());
            }
        }

        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let fetched: HashMap<DriveId, Option<Details>> = unique
            .iter()
            .cloned()
            .zip(self.fetch_remote(&unique)?)
            .collect();

        Ok(drivewsids
            .iter()
            .map(|id| fetched.get(id).cloned().flatten())
            .collect())
    }

    /// One remote call; found details are stored, invalid identifiers purged
    fn fetch_remote(&mut self, drivewsids: &[DriveId]) -> Result<Vec<Option<Details>>> {
        info!("retrieveItemDetailsInFolders: {} ids", drivewsids.len());

        let response = self.api.retrieve_item_details_in_folders(drivewsids)?;

        if response.len() != drivewsids.len() {
            return Err(ApiError::Decoding(format!(
                "requested {} details, received {}",
                drivewsids.len(),
                response.len()
            ))
            .into());
        }

        let mut result = Vec::with_capacity(response.len());
        let mut invalid = Vec::new();

        for (id, answer) in drivewsids.iter().zip(response) {
            match answer {
                MaybeDetails::Found(details) => {
                    self.put_details(details.clone());
                    result.push(Some(details));
                }
                MaybeDetails::InvalidId => {
                    debug!("{} is invalid", id);
                    invalid.push(id.clone());
                    result.push(None);
                }
            }
        }

        if !invalid.is_empty() {
            self.remove_details(&invalid);
        }

        Ok(result)
    }
}
