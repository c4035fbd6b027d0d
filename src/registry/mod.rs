//! Registry Module
//!
//! The shared, ordered list of files the server offers.
//!
//! ## Responsibilities
//! - Hold files in insertion order; a file's number is its 1-based position
//! - Reject duplicate additions by path identity
//! - Serialize every operation behind one coarse lock
//! - Seed itself from a directory tree at startup
//!
//! ## Concurrency
//! One `parking_lot::Mutex` covers both the ordered list and the duplicate
//! key set, held for the whole of each call. Two racing `add`s therefore
//! cannot both pass the duplicate check, and a `get` never observes a
//! half-applied `remove`.
//!
//! Numbers are positions, not identifiers. Removing file `k` renumbers every
//! later file, so a client holding an old listing may address a different
//! file than it saw. The lock does not (and cannot) hide that.

mod entry;
mod scan;
mod table;

pub use entry::{base_name, DedupKey, FileEntry};
pub use scan::scan_directory;
pub use table::{AddOutcome, FileRegistry};
