//! Source tree enumeration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;

/// A directory and the files directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Enumerate every directory under `root`, parents before children.
///
/// Each listing holds the directory's direct files, restricted to names ending
/// in `extension` when one is given. Files ending in `template_extension` are
/// never listed. Entries are sorted by name so repeated walks of the same
/// tree produce the same order.
pub fn walk_dir(
    root: &Path,
    extension: Option<&str>,
    template_extension: &str,
) -> Result<Vec<DirListing>, BuildError> {
    let mut listings: Vec<DirListing> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    let walker = WalkDir::new(root).follow_links(true).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            index.insert(path.to_path_buf(), listings.len());
            listings.push(DirListing {
                dir: path.to_path_buf(),
                files: Vec::new(),
            });
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.ends_with(template_extension) {
            continue;
        }
        if extension.is_some_and(|ext| !name.ends_with(ext)) {
            continue;
        }

        let Some(slot) = path.parent().and_then(|p| index.get(p)) else {
            continue;
        };
        listings[*slot].files.push(path.to_path_buf());
    }

    Ok(listings)
}
