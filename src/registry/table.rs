//! Registry implementation
//!
//! Vec + HashSet pair behind a single Mutex.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use parking_lot::Mutex;

use crate::error::{Result, ShareError};
use super::{scan_directory, DedupKey, FileEntry};

/// Result of [`FileRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended; the entry now has this number
    Added { number: usize },

    /// An entry with the same key already exists; nothing changed
    DuplicateSkipped,
}

/// State guarded by the registry lock
///
/// `keys` holds exactly one key per element of `entries`.
#[derive(Default)]
struct RegistryState {
    entries: Vec<FileEntry>,
    keys: HashSet<DedupKey>,
}

impl RegistryState {
    /// Map a 1-based file number to a vector index
    fn index_of(&self, number: i64) -> Option<usize> {
        if number >= 1 && number <= self.entries.len() as i64 {
            Some((number - 1) as usize)
        } else {
            None
        }
    }
}

/// Ordered, duplicate-free list of files shared by all connections
///
/// Every method takes the lock for its full duration. No reference into
/// the underlying list ever escapes; callers get owned copies.
#[derive(Default)]
pub struct FileRegistry {
    state: Mutex<RegistryState>,
}

impl FileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from entries, applying the duplicate rule
    pub fn from_entries(entries: impl IntoIterator<Item = FileEntry>) -> Self {
        let registry = Self::new();
        {
            let mut state = registry.state.lock();
            for entry in entries {
                if state.keys.insert(entry.key()) {
                    state.entries.push(entry);
                }
            }
        }
        registry
    }

    /// Seed a registry from every file under `root`
    pub fn scan(root: &Path) -> Result<Self> {
        Ok(Self::from_entries(scan_directory(root)?))
    }

    /// Current `(number, name)` pairs in order
    pub fn list(&self) -> Vec<(usize, String)> {
        let state = self.state.lock();
        state
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i + 1, entry.name().to_string()))
            .collect()
    }

    /// Client-visible listing: `"<number>. <name>\n"` per file
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (number, name) in self.list() {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{}. {}", number, name);
        }
        out
    }

    /// Look up a file by number
    pub fn get(&self, number: i64) -> Result<FileEntry> {
        let state = self.state.lock();
        state
            .index_of(number)
            .map(|i| state.entries[i].clone())
            .ok_or(ShareError::NotFound { number })
    }

    /// Remove a file by number, shifting later files down by one
    pub fn remove(&self, number: i64) -> Result<FileEntry> {
        let mut state = self.state.lock();
        let index = state
            .index_of(number)
            .ok_or(ShareError::NotFound { number })?;

        let entry = state.entries.remove(index);
        state.keys.remove(&entry.key());

        tracing::info!("{} removed from the server", entry.name());
        Ok(entry)
    }

    /// Append a file unless one with the same key is already present
    pub fn add(&self, entry: FileEntry) -> AddOutcome {
        let mut state = self.state.lock();

        if !state.keys.insert(entry.key()) {
            tracing::info!("{} is already on the server", entry.name());
            return AddOutcome::DuplicateSkipped;
        }

        tracing::info!("{} added to the server", entry.name());
        state.entries.push(entry);
        AddOutcome::Added {
            number: state.entries.len(),
        }
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
