/*!
 * Drive commands built on the lookup engine
 *
 * Every action resolves its paths in one batch. Mutating actions update the
 * cache only from what the drive answered: removed identifiers are purged and
 * the affected folders are fetched fresh.
 */

mod autocomplete;
mod ls;
mod mkdir;
mod mv;
mod rm;

pub use autocomplete::{autocomplete, CompleteOptions};
pub use ls::{ls, Listing, LsOptions};
pub use mkdir::mkdir;
pub use mv::{mv, MoveOutcome};
pub use rm::{rm, RmOptions};

use crate::error::Result;
use crate::lookup::GetByPathResult;
use crate::types::{Details, DriveId};

/// A resolved item together with the folder listing it
#[derive(Debug, Clone, PartialEq)]
struct Located {
    drivewsid: DriveId,
    etag: String,
    parent: DriveId,
    folder: Option<Details>,
}

/// Split a resolution into the target and its parent, refusing roots
fn locate(result: GetByPathResult) -> Result<Located> {
    match result {
        GetByPathResult::Valid {
            hierarchy,
            file: Some(file),
        } => Ok(Located {
            drivewsid: file.drivewsid,
            etag: file.etag,
            parent: hierarchy.last().drivewsid().clone(),
            folder: None,
        }),
        GetByPathResult::Valid {
            hierarchy,
            file: None,
        } => match hierarchy.entries() {
            [.., parent, folder] => Ok(Located {
                drivewsid: folder.drivewsid().clone(),
                etag: folder.etag().to_string(),
                parent: parent.drivewsid().clone(),
                folder: Some(folder.clone()),
            }),
            _ => crate::bail!(InvalidArgument, "{} root cannot be the target", hierarchy.root().label()),
        },
        GetByPathResult::Invalid { cause, .. } => Err(cause.into()),
    }
}
