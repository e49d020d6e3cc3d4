//! Folder descendants fetched level by level

use std::collections::HashMap;

use tracing::debug;

use super::Lookup;
use crate::error::Result;
use crate::types::{Details, DriveId};

/// A folder with its descendants down to a bounded depth
#[derive(Debug, Clone, PartialEq)]
pub enum FolderTree {
    /// Children folders were fetched
    Deep {
        details: Details,
        children: Vec<FolderTree>,
    },
    /// Depth limit reached; only the folder's own listing is known
    Shallow { details: Details },
}

impl FolderTree {
    pub fn details(&self) -> &Details {
        match self {
            Self::Deep { details, .. } | Self::Shallow { details } => details,
        }
    }

    pub fn children(&self) -> &[FolderTree] {
        match self {
            Self::Deep { children, .. } => children,
            Self::Shallow { .. } => &[],
        }
    }
}

impl Lookup<'_> {
    /// Trees for every folder, with one batched fetch per level shared by all
    pub fn get_folder_trees(&mut self, folders: &[Details], depth: usize) -> Result<Vec<FolderTree>> {
        self.with_temp_cache(|lookup| lookup.build_trees(folders, depth))
    }

    fn build_trees(&mut self, folders: &[Details], depth: usize) -> Result<Vec<FolderTree>> {
        if depth == 0 {
            return Ok(folders
                .iter()
                .map(|details| FolderTree::Shallow {
                    details: details.clone(),
                })
                .collect());
        }

        let child_ids: Vec<DriveId> = folders
            .iter()
            .flat_map(|folder| folder.items())
            .filter(|child| child.is_folder_like())
            .map(|child| child.drivewsid().clone())
            .collect();

        if child_ids.is_empty() {
            return Ok(folders
                .iter()
                .map(|details| FolderTree::Deep {
                    details: details.clone(),
                    children: Vec::new(),
                })
                .collect());
        }

        debug!("folder trees: {} folders at depth {}", child_ids.len(), depth);

        let children: Vec<Details> = self
            .retrieve_details(&child_ids)?
            .into_iter()
            .flatten()
            .collect();

        let subtrees: HashMap<DriveId, FolderTree> = self
            .build_trees(&children, depth - 1)?
            .into_iter()
            .map(|tree| (tree.details().drivewsid().clone(), tree))
            .collect();

        Ok(folders
            .iter()
            .map(|folder| FolderTree::Deep {
                details: folder.clone(),
                children: folder
                    .items()
                    .iter()
                    .filter_map(|child| subtrees.get(child.drivewsid()).cloned())
                    .collect(),
            })
            .collect())
    }
}
