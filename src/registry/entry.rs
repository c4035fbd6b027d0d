//! File entries
//!
//! One file offered by the server.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Identity used to detect duplicate additions
///
/// Derived from the path the entry's content lives at, never from the
/// content itself: two different names with identical bytes are distinct,
/// and re-uploading under an existing path is a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(PathBuf);

/// A file available on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Display name (base name only)
    name: String,

    /// Content length in bytes at the time the entry was created
    size: u64,

    /// Where the content is read from
    path: PathBuf,
}

impl FileEntry {
    /// Create an entry from already known parts
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }

    /// Build an entry for an existing file on disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;
        let size = fs::metadata(path)?.len();

        Ok(Self::new(name, size, path))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duplicate-detection key for this entry
    pub fn key(&self) -> DedupKey {
        DedupKey(self.path.clone())
    }

    /// Read the whole content into memory
    pub fn read_content(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Reduce a client-supplied name to its final path component
///
/// Returns `None` for names with no usable base component such as `""`,
/// `"."`, `".."` or `"dir/.."`.
pub fn base_name(name: &str) -> Option<&str> {
    Path::new(name).file_name().and_then(|n| n.to_str())
}
