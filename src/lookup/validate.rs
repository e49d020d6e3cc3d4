//! Re-validation of cached chains against fresh details

use std::collections::{HashMap, HashSet};

use strum::Display;
use tracing::debug;

use super::hierarchy::Hierarchy;
use super::Lookup;
use crate::cache::CachedPath;
use crate::error::{DriveError, Result};
use crate::path::NormalizedPath;
use crate::types::{Details, DriveId, RootKind};

/// How a cached reference turned out to be outdated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StaleReason {
    /// The parent no longer lists the entity, or the entity is invalid
    Missing,
    /// The parent still lists the entity under another name
    Renamed,
    /// The name now refers to another entity
    Replaced,
}

/// First outdated position of a cached chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleReference {
    pub drivewsid: DriveId,
    pub segment: String,
    pub reason: StaleReason,
}

/// Longest confirmed prefix of one cached chain
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub validated: Hierarchy,
    pub stale: Option<StaleReference>,
}

impl Lookup<'_> {
    /// Confirm cached chains with one batched fetch of the root and every
    /// entity the chains reference
    pub(crate) fn validate_hierarchies(
        &mut self,
        root_kind: RootKind,
        candidates: &[CachedPath],
        paths: &[NormalizedPath],
    ) -> Result<Vec<Validation>> {
        let root_id = root_kind.drivewsid();

        let mut ids = vec![root_id.clone()];
        let mut seen: HashSet<DriveId> = HashSet::from([root_id.clone()]);
        for candidate in candidates {
            for details in candidate.hierarchy.iter().skip(1) {
                if seen.insert(details.drivewsid().clone()) {
                    ids.push(details.drivewsid().clone());
                }
            }
        }

        let fetched = self.retrieve_details(&ids)?;
        let fresh: HashMap<DriveId, Details> = ids
            .into_iter()
            .zip(fetched)
            .filter_map(|(id, details)| details.map(|details| (id, details)))
            .collect();

        let root = fresh
            .get(&root_id)
            .cloned()
            .ok_or_else(|| DriveError::NotFound(format!("{} root is invalid", root_kind)))?;

        Ok(candidates
            .iter()
            .zip(paths)
            .map(|(candidate, path)| validate_chain(&root, candidate, path.segments(), &fresh))
            .collect())
    }
}

fn validate_chain(
    root: &Details,
    candidate: &CachedPath,
    segments: &[String],
    fresh: &HashMap<DriveId, Details>,
) -> Validation {
    let mut validated = Hierarchy::new(root.clone());

    for (cached, segment) in candidate.hierarchy.iter().skip(1).zip(segments) {
        let parent = validated.last();
        let id = cached.drivewsid();

        let confirmed = match parent.find_child(segment) {
            Some(child) if child.drivewsid() == id && child.is_folder_like() => {
                fresh.get(id).cloned().ok_or(StaleReason::Missing)
            }
            Some(_) => Err(StaleReason::Replaced),
            None if parent.items().iter().any(|child| child.drivewsid() == id) => {
                Err(StaleReason::Renamed)
            }
            None => Err(StaleReason::Missing),
        };

        match confirmed {
            Ok(details) => validated.push(details),
            Err(reason) => {
                debug!(
                    "stale reference {} at segment {:?}: {}",
                    id, segment, reason
                );
                return Validation {
                    validated,
                    stale: Some(StaleReference {
                        drivewsid: id.clone(),
                        segment: segment.clone(),
                        reason,
                    }),
                };
            }
        }
    }

    Validation {
        validated,
        stale: None,
    }
}
