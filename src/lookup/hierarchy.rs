//! Resolution results

use super::error::PathError;
use crate::path::NormalizedPath;
use crate::types::{Details, DriveItem, ItemRef};

/// Chain of folder details starting at a root, one entry per matched segment
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    entries: Vec<Details>,
}

impl Hierarchy {
    pub fn new(root: Details) -> Self {
        Self {
            entries: vec![root],
        }
    }

    pub fn root(&self) -> &Details {
        &self.entries[0]
    }

    /// Deepest folder of the chain
    pub fn last(&self) -> &Details {
        &self.entries[self.entries.len() - 1]
    }

    pub fn push(&mut self, details: Details) {
        self.entries.push(details);
    }

    /// Number of path segments the chain covers
    pub fn depth(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[Details] {
        &self.entries
    }

    pub fn into_last(mut self) -> Details {
        let last = self.entries.len() - 1;
        self.entries.swap_remove(last)
    }

    /// Path spelled by the chain
    pub fn path(&self) -> NormalizedPath {
        self.entries[1..]
            .iter()
            .fold(NormalizedPath::root(), |path, details| path.join(&details.file_name()))
    }
}

/// Outcome of resolving one path
#[derive(Debug, Clone, PartialEq)]
pub enum GetByPathResult {
    /// Every segment resolved; `file` is set when the last one is a file
    Valid {
        hierarchy: Hierarchy,
        file: Option<ItemRef>,
    },
    /// Resolution stopped; `rest` holds the unresolved segments and is never empty
    Invalid {
        validated: Hierarchy,
        rest: Vec<String>,
        cause: PathError,
    },
}

impl GetByPathResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// The deepest folder that was confirmed
    pub fn last_folder(&self) -> &Details {
        match self {
            Self::Valid { hierarchy, .. } => hierarchy.last(),
            Self::Invalid { validated, .. } => validated.last(),
        }
    }

    /// The resolved node, or the cause of the failure
    pub fn into_item(self) -> Result<DriveItem, PathError> {
        match self {
            Self::Valid {
                file: Some(file), ..
            } => Ok(DriveItem::File(file)),
            Self::Valid {
                hierarchy,
                file: None,
            } => Ok(DriveItem::Folder(hierarchy.into_last())),
            Self::Invalid { cause, .. } => Err(cause),
        }
    }
}
