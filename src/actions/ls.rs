use glob_match::glob_match;

use crate::error::Result;
use crate::lookup::{FolderTree, Lookup, PathError};
use crate::path::NormalizedPath;
use crate::types::{ChildItem, Details, DriveItem, ItemRef, RootKind};

#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    /// Resolve against the trash root
    pub trash: bool,
    /// Fetch descendants down to `depth`
    pub recursive: bool,
    pub depth: usize,
    /// Treat the last segment as a pattern over the parent's children
    pub glob: bool,
}

/// What one `ls` argument resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Folder {
        path: NormalizedPath,
        details: Details,
    },
    Matches {
        path: NormalizedPath,
        pattern: String,
        items: Vec<ChildItem>,
    },
    File {
        path: NormalizedPath,
        item: ItemRef,
    },
    Tree {
        path: NormalizedPath,
        tree: FolderTree,
    },
}

impl Listing {
    pub fn path(&self) -> &NormalizedPath {
        match self {
            Self::Folder { path, .. }
            | Self::Matches { path, .. }
            | Self::File { path, .. }
            | Self::Tree { path, .. } => path,
        }
    }
}

fn is_pattern(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

pub fn ls(lookup: &mut Lookup<'_>, paths: &[String], options: &LsOptions) -> Result<Vec<Listing>> {
    let root_kind = RootKind::from_trash_flag(options.trash);

    let requests: Vec<(NormalizedPath, Option<String>)> = paths
        .iter()
        .map(|raw| {
            let path = NormalizedPath::new(raw);
            match path.basename() {
                Some(name) if options.glob && is_pattern(name) => {
                    let pattern = name.to_string();
                    (path.parent(), Some(pattern))
                }
                _ => (path, None),
            }
        })
        .collect();

    let targets: Vec<NormalizedPath> = requests.iter().map(|(path, _)| path.clone()).collect();
    let results = lookup.get_by_paths(root_kind, &targets)?;

    let mut listings = Vec::with_capacity(results.len());
    for ((path, pattern), result) in requests.into_iter().zip(results) {
        let listing = match (result.into_item()?, pattern) {
            (DriveItem::Folder(details), Some(pattern)) => Listing::Matches {
                items: details
                    .items()
                    .iter()
                    .filter(|child| glob_match(&pattern, &child.file_name()))
                    .cloned()
                    .collect(),
                path,
                pattern,
            },
            (DriveItem::Folder(details), None) => Listing::Folder { path, details },
            (DriveItem::File(item), None) => Listing::File { path, item },
            (DriveItem::File(item), Some(_)) => {
                return Err(PathError::NotAFolder {
                    name: item.file_name(),
                }
                .into())
            }
        };
        listings.push(listing);
    }

    if !options.recursive {
        return Ok(listings);
    }

    let folders: Vec<Details> = listings
        .iter()
        .filter_map(|listing| match listing {
            Listing::Folder { details, .. } => Some(details.clone()),
            _ => None,
        })
        .collect();

    let mut trees = lookup.get_folder_trees(&folders, options.depth)?.into_iter();

    Ok(listings
        .into_iter()
        .map(|listing| match listing {
            Listing::Folder { path, details } => match trees.next() {
                Some(tree) => Listing::Tree { path, tree },
                None => Listing::Folder { path, details },
            },
            other => other,
        })
        .collect())
}
