use tracing::info;

use super::locate;
use crate::api::ItemEtag;
use crate::error::{DriveError, Result};
use crate::lookup::Lookup;
use crate::path::NormalizedPath;
use crate::prompt::Confirm;
use crate::types::{DriveId, RootKind};

#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Paths are inside the trash; removal is then permanent
    pub trash: bool,
    /// Delete instead of moving to the trash
    pub permanent: bool,
    /// Skip the confirmation
    pub force: bool,
}

/// Remove every path; returns the identifiers the drive reported removed
pub fn rm(
    lookup: &mut Lookup<'_>,
    paths: &[String],
    options: &RmOptions,
    prompt: &dyn Confirm,
) -> Result<Vec<DriveId>> {
    crate::ensure!(!paths.is_empty(), InvalidArgument, "no paths to remove");

    let root_kind = RootKind::from_trash_flag(options.trash);
    let paths: Vec<NormalizedPath> = paths.iter().map(|p| NormalizedPath::new(p)).collect();

    if let Some(root) = paths.iter().find(|path| path.is_root()) {
        crate::bail!(InvalidArgument, "refusing to remove {} root {}", root_kind, root);
    }

    let located = lookup
        .get_by_paths(root_kind, &paths)?
        .into_iter()
        .map(locate)
        .collect::<Result<Vec<_>>>()?;

    let permanent = options.permanent || options.trash;

    if !options.force {
        let listed: Vec<String> = paths.iter().map(ToString::to_string).collect();
        let message = if permanent {
            format!("Permanently delete {}?", listed.join(", "))
        } else {
            format!("Move {} to trash?", listed.join(", "))
        };

        if !prompt.confirm(&message)? {
            return Err(DriveError::ConfirmationDeclined);
        }
    }

    let items: Vec<ItemEtag> = located
        .iter()
        .map(|item| ItemEtag {
            drivewsid: item.drivewsid.clone(),
            etag: item.etag.clone(),
        })
        .collect();

    info!(
        "{}: {} items",
        if permanent { "deleteItems" } else { "moveItemsToTrash" },
        items.len()
    );
    let removed = lookup.api().move_items_to_trash(&items, permanent)?;

    lookup.purge(&removed);

    let mut refresh: Vec<DriveId> = located.into_iter().map(|item| item.parent).collect();
    if !permanent && lookup.cache().get_trash().is_ok() {
        refresh.push(DriveId::trash());
    }
    lookup.retrieve_details_fresh(&refresh)?;

    Ok(removed)
}
