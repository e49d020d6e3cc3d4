//! Path resolution

use tracing::debug;

use super::error::PathError;
use super::hierarchy::{GetByPathResult, Hierarchy};
use super::{ApiUsage, Lookup};
use crate::cache::{walk_cached, CachedPath};
use crate::error::{DriveError, Result};
use crate::path::NormalizedPath;
use crate::types::{ChildItem, Details, DriveId, DriveItem, RootKind};

/// A path being extended by the worklist
enum Step {
    Pending {
        hierarchy: Hierarchy,
        rest: Vec<String>,
    },
    Done(GetByPathResult),
}

/// What the next segment of a pending path needs
enum Next {
    Finish(GetByPathResult),
    Fetch(DriveId),
}

impl Lookup<'_> {
    /// Root details, from known data or fetched
    pub fn get_root(&mut self, root_kind: RootKind) -> Result<Details> {
        let id = root_kind.drivewsid();

        if let Some(details) = self.view(&id) {
            return Ok(details.clone());
        }

        if self.usage == ApiUsage::OnlyCache {
            let cached = match root_kind {
                RootKind::Drive => self.cache.get_root(),
                RootKind::Trash => self.cache.get_trash(),
            };
            return Ok(cached?.clone());
        }

        let mut details = self.retrieve_details_strict(&[id])?;
        details
            .pop()
            .ok_or_else(|| DriveError::Unexpected(format!("no details for {} root", root_kind)))
    }

    /// Resolve every path against the same root, keeping the input order
    pub fn get_by_paths(
        &mut self,
        root_kind: RootKind,
        paths: &[NormalizedPath],
    ) -> Result<Vec<GetByPathResult>> {
        if self.usage == ApiUsage::Validate {
            self.with_temp_cache(|lookup| lookup.resolve_paths(root_kind, paths))
        } else {
            self.resolve_paths(root_kind, paths)
        }
    }

    pub fn get_by_path(&mut self, root_kind: RootKind, path: &NormalizedPath) -> Result<GetByPathResult> {
        let mut results = self.get_by_paths(root_kind, std::slice::from_ref(path))?;
        results
            .pop()
            .ok_or_else(|| DriveError::Unexpected(format!("no result for {}", path)))
    }

    /// Details of the folder at `path`
    pub fn get_by_path_folder(&mut self, root_kind: RootKind, path: &NormalizedPath) -> Result<Details> {
        match self.get_by_path(root_kind, path)?.into_item()? {
            DriveItem::Folder(details) => Ok(details),
            DriveItem::File(file) => Err(PathError::NotAFolder {
                name: file.file_name(),
            }
            .into()),
        }
    }

    /// Resolve every path, failing on the first one that does not resolve
    pub fn get_by_paths_strict(
        &mut self,
        root_kind: RootKind,
        paths: &[NormalizedPath],
    ) -> Result<Vec<DriveItem>> {
        self.get_by_paths(root_kind, paths)?
            .into_iter()
            .map(|result| result.into_item().map_err(DriveError::from))
            .collect()
    }

    fn resolve_paths(
        &mut self,
        root_kind: RootKind,
        paths: &[NormalizedPath],
    ) -> Result<Vec<GetByPathResult>> {
        let root = self.get_root(root_kind)?;

        let candidates: Vec<CachedPath> = paths
            .iter()
            .map(|path| walk_cached(&root, path.segments(), |id| self.view(id)))
            .collect();

        let validations = self.validate_hierarchies(root_kind, &candidates, paths)?;

        let mut steps: Vec<Step> = validations
            .into_iter()
            .zip(paths)
            .map(|(validation, path)| {
                let rest = path.segments()[validation.validated.depth()..].to_vec();
                Step::Pending {
                    hierarchy: validation.validated,
                    rest,
                }
            })
            .collect();

        let mut round = 0;
        loop {
            let mut wanted: Vec<(usize, DriveId)> = Vec::new();

            for (index, step) in steps.iter_mut().enumerate() {
                let next = match &*step {
                    Step::Pending { hierarchy, rest } => next_step(hierarchy, rest),
                    Step::Done(_) => continue,
                };

                match next {
                    Next::Finish(result) => *step = Step::Done(result),
                    Next::Fetch(id) => wanted.push((index, id)),
                }
            }

            if wanted.is_empty() {
                break;
            }

            round += 1;
            debug!("resolve round {}: {} folders to extend", round, wanted.len());

            let ids: Vec<DriveId> = wanted.iter().map(|(_, id)| id.clone()).collect();
            let fetched = self.retrieve_details(&ids)?;

            for ((index, _), details) in wanted.into_iter().zip(fetched) {
                let finished = match &mut steps[index] {
                    Step::Pending { hierarchy, rest } => match details {
                        Some(details) => {
                            hierarchy.push(details);
                            rest.remove(0);
                            None
                        }
                        // vanished between the listing and the fetch
                        None => Some(not_found(hierarchy, rest)),
                    },
                    Step::Done(_) => None,
                };

                if let Some(result) = finished {
                    steps[index] = Step::Done(result);
                }
            }
        }

        steps
            .into_iter()
            .zip(paths)
            .map(|(step, path)| match step {
                Step::Done(result) => Ok(result),
                Step::Pending { .. } => Err(DriveError::Unexpected(format!(
                    "resolution of {} did not finish",
                    path
                ))),
            })
            .collect()
    }
}

fn next_step(hierarchy: &Hierarchy, rest: &[String]) -> Next {
    let Some(segment) = rest.first() else {
        return Next::Finish(GetByPathResult::Valid {
            hierarchy: hierarchy.clone(),
            file: None,
        });
    };

    match hierarchy.last().find_child(segment) {
        None => Next::Finish(not_found(hierarchy, rest)),
        Some(ChildItem::File(file)) if rest.len() == 1 => Next::Finish(GetByPathResult::Valid {
            hierarchy: hierarchy.clone(),
            file: Some(file.clone()),
        }),
        Some(ChildItem::File(file)) => Next::Finish(GetByPathResult::Invalid {
            validated: hierarchy.clone(),
            rest: rest.to_vec(),
            cause: PathError::NotAFolder {
                name: file.file_name(),
            },
        }),
        Some(child) => Next::Fetch(child.drivewsid().clone()),
    }
}

fn not_found(hierarchy: &Hierarchy, rest: &[String]) -> GetByPathResult {
    GetByPathResult::Invalid {
        validated: hierarchy.clone(),
        rest: rest.to_vec(),
        cause: PathError::NotFound {
            name: rest.first().cloned().unwrap_or_default(),
            parent: hierarchy.last().label(),
        },
    }
}
