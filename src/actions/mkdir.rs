use tracing::info;

use crate::api::CreatedFolder;
use crate::error::{DriveError, Result};
use crate::lookup::{GetByPathResult, Lookup, PathError};
use crate::path::NormalizedPath;
use crate::types::{Details, RootKind};

/// Create the folder at `path`; with `parents`, every missing level is created
/// and an existing folder is not an error
pub fn mkdir(lookup: &mut Lookup<'_>, path: &NormalizedPath, parents: bool) -> Result<Details> {
    crate::ensure!(!path.is_root(), InvalidArgument, "cannot create the root folder");

    match lookup.get_by_path(RootKind::Drive, path)? {
        GetByPathResult::Valid {
            file: Some(file), ..
        } => crate::bail!(InvalidArgument, "{} already exists as a file: {}", path, file.file_name()),
        GetByPathResult::Valid {
            hierarchy,
            file: None,
        } => {
            crate::ensure!(parents, InvalidArgument, "{} already exists", path);
            Ok(hierarchy.into_last())
        }
        GetByPathResult::Invalid {
            validated,
            rest,
            cause,
        } => {
            let creatable = matches!(cause, PathError::NotFound { .. }) && (parents || rest.len() == 1);
            if !creatable {
                return Err(cause.into());
            }

            let mut parent = validated.into_last();
            for name in &rest {
                parent = create_folder(lookup, &parent, name)?;
            }

            Ok(parent)
        }
    }
}

fn create_folder(lookup: &mut Lookup<'_>, parent: &Details, name: &str) -> Result<Details> {
    info!("createFolders: {} in {}", name, parent.label());

    let created = lookup
        .api()
        .create_folders(parent.drivewsid(), &[name.to_string()])?;

    let folder = match created.into_iter().next() {
        Some(CreatedFolder::Created(item)) => item,
        Some(CreatedFolder::Unknown { client_id }) => {
            crate::bail!(Unexpected, "folder {} was not created", client_id)
        }
        None => crate::bail!(Unexpected, "empty createFolders response"),
    };

    let fresh = lookup.retrieve_details_fresh(&[folder.drivewsid.clone(), parent.drivewsid().clone()])?;

    fresh
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| DriveError::NotFound(format!("created folder {} is invalid", folder.drivewsid)))
}
