//! Seed directory scan

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, ShareError};
use super::FileEntry;

/// Recursively list every non-directory file under `root`
///
/// Subdirectories are traversed and flattened; they never become entries
/// themselves. Symlinks are followed, so a link to a directory is
/// traversed like one. Entries that cannot be stat'ed (dangling links,
/// permission problems, link loops) are skipped with a warning; only an
/// unreadable root is fatal. Entries are visited in file-name order within
/// each directory so the initial numbering is stable across runs.
pub fn scan_directory(root: &Path) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(ShareError::Startup(format!(
            "seed directory '{}' not found or not a directory",
            root.display()
        )));
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let item = match item {
            Ok(item) => item,
            Err(e) if e.depth() == 0 => return Err(io::Error::from(e).into()),
            Err(e) => {
                tracing::warn!("Skipping unreadable seed entry: {}", e);
                continue;
            }
        };
        if item.file_type().is_dir() {
            continue;
        }
        match FileEntry::from_path(item.path()) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Skipping {}: {}", item.path().display(), e),
        }
    }

    tracing::debug!("Scanned {} files under {}", entries.len(), root.display());
    Ok(entries)
}
