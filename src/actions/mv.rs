use tracing::info;

use super::locate;
use crate::api::{ItemEtag, RenameItem};
use crate::error::{DriveError, Result};
use crate::lookup::{GetByPathResult, Lookup, PathError};
use crate::path::{parse_name, NormalizedPath};
use crate::types::{DriveId, RootKind};

/// What `mv` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { into: DriveId },
    Renamed { name: String },
    MovedAndRenamed { into: DriveId, name: String },
}

/// Move or rename `source` according to what `destination` resolves to
pub fn mv(
    lookup: &mut Lookup<'_>,
    source: &NormalizedPath,
    destination: &NormalizedPath,
) -> Result<MoveOutcome> {
    crate::ensure!(!source.is_root(), InvalidArgument, "cannot move the root folder");

    let mut results = lookup
        .get_by_paths(RootKind::Drive, &[source.clone(), destination.clone()])?
        .into_iter();

    let (Some(src), Some(dst)) = (results.next(), results.next()) else {
        crate::bail!(Unexpected, "missing resolution for {} or {}", source, destination);
    };

    let item = locate(src)?;
    let etag = ItemEtag {
        drivewsid: item.drivewsid.clone(),
        etag: item.etag.clone(),
    };

    let outcome = match dst {
        GetByPathResult::Valid {
            file: Some(file), ..
        } => {
            return Err(PathError::NotAFolder {
                name: file.file_name(),
            }
            .into())
        }
        GetByPathResult::Valid {
            hierarchy,
            file: None,
        } => {
            let into = hierarchy.last().drivewsid().clone();
            info!("moveItems: {} into {}", item.drivewsid, into);
            let moved = lookup.api().move_items(&into, &[etag])?;
            crate::ensure!(
                moved.iter().any(|moved| moved.drivewsid == item.drivewsid),
                Unexpected,
                "{} missing from moveItems response",
                item.drivewsid
            );
            MoveOutcome::Moved { into }
        }
        GetByPathResult::Invalid {
            validated,
            rest,
            cause: PathError::NotFound { .. },
        } if rest.len() == 1 => {
            let into = validated.last().drivewsid().clone();
            let name = rest[0].clone();

            if into == item.parent {
                rename(lookup, &into, etag, &name)?;
                MoveOutcome::Renamed { name }
            } else {
                info!("moveItems: {} into {}", item.drivewsid, into);
                let moved = lookup.api().move_items(&into, &[etag])?;
                let etag = moved
                    .into_iter()
                    .find(|moved| moved.drivewsid == item.drivewsid)
                    .map(|moved| ItemEtag {
                        drivewsid: moved.drivewsid,
                        etag: moved.etag,
                    })
                    .ok_or_else(|| {
                        DriveError::Unexpected(format!("{} missing from moveItems response", item.drivewsid))
                    })?;

                rename(lookup, &into, etag, &name)?;
                MoveOutcome::MovedAndRenamed { into, name }
            }
        }
        GetByPathResult::Invalid { cause, .. } => return Err(cause.into()),
    };

    let mut refresh = vec![item.parent.clone()];
    match &outcome {
        MoveOutcome::Moved { into } | MoveOutcome::MovedAndRenamed { into, .. } => {
            refresh.push(into.clone())
        }
        MoveOutcome::Renamed { .. } => {}
    }
    if item.folder.is_some() {
        refresh.push(item.drivewsid.clone());
    }
    lookup.retrieve_details_fresh(&refresh)?;

    Ok(outcome)
}

/// Rename `item` inside `parent` and record the drive's answer in the parent listing
fn rename(lookup: &mut Lookup<'_>, parent: &DriveId, item: ItemEtag, file_name: &str) -> Result<()> {
    let (name, extension) = parse_name(file_name);
    let drivewsid = item.drivewsid;
    info!("renameItems: {} to {}", drivewsid, file_name);

    let renamed = lookup.api().rename_items(&[RenameItem {
        drivewsid: drivewsid.clone(),
        etag: item.etag,
        name,
        extension,
    }])?;

    let child = renamed
        .into_iter()
        .find(|child| child.drivewsid() == &drivewsid)
        .ok_or_else(|| DriveError::Unexpected(format!("{} missing from renameItems response", drivewsid)))?;

    lookup.update_child(parent, child);

    Ok(())
}
