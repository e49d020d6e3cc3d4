use crate::error::Result;
use crate::lookup::{ApiUsage, Lookup};
use crate::path::NormalizedPath;
use crate::types::RootKind;

#[derive(Debug, Clone, Default)]
pub struct CompleteOptions {
    pub trash: bool,
    /// Only suggest files
    pub file: bool,
    /// Only suggest folders
    pub dir: bool,
    /// Never call the remote
    pub cached: bool,
}

/// Paths completing `input`; folders carry a trailing `/`
pub fn autocomplete(lookup: &mut Lookup<'_>, input: &str, options: &CompleteOptions) -> Result<Vec<String>> {
    let path = NormalizedPath::new(input);

    let (dir, prefix) = if input.is_empty() || input.ends_with('/') {
        (path, String::new())
    } else {
        let prefix = path.basename().unwrap_or_default().to_string();
        (path.parent(), prefix)
    };

    let root_kind = RootKind::from_trash_flag(options.trash);
    let usage = if options.cached {
        ApiUsage::OnlyCache
    } else {
        lookup.usage()
    };

    let folder = lookup.with_usage(usage, |lookup| lookup.get_by_path_folder(root_kind, &dir))?;

    let mut suggestions: Vec<String> = folder
        .items()
        .iter()
        .filter(|child| child.file_name().starts_with(&prefix))
        .filter(|child| match (options.file, options.dir) {
            (true, false) => child.is_file(),
            (false, true) => child.is_folder_like(),
            _ => true,
        })
        .map(|child| {
            let full = dir.join(&child.file_name()).to_string();
            if child.is_folder_like() {
                format!("{}/", full)
            } else {
                full
            }
        })
        .collect();

    suggestions.sort();
    Ok(suggestions)
}
