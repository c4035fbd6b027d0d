//! # fileshare
//!
//! A minimal networked file-sharing service:
//! - A server holding an ordered registry of files
//! - One thread per client connection
//! - A small binary protocol to list, download, upload and remove files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (accept loop, one thread per client)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Handler                           │
//! │          (read command → dispatch → reply → loop)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │  Registry   │
//!   │   (codec)   │          │   (Mutex)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Files dir   │
//!                           │ (seed/save) │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod registry;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ShareError, Result};
pub use config::Config;
pub use registry::{AddOutcome, FileEntry, FileRegistry};
pub use network::{Server, ShutdownHandle};
pub use client::{Client, Download};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fileshare
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
