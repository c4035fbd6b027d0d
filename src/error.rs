//! Error types for fileshare
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ShareError
pub type Result<T> = std::result::Result<T, ShareError>;

/// Unified error type for fileshare operations
#[derive(Debug, Error)]
pub enum ShareError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A declared-length read ran into the end of the stream
    #[error("Stream closed before the declared length was read")]
    StreamClosed,

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("File number {number} not found")]
    NotFound { number: i64 },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Unknown command byte: {0}")]
    UnknownCommand(i8),

    #[error("Unknown status byte: {0}")]
    UnknownStatus(i8),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Startup / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Startup failed: {0}")]
    Startup(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShareError {
    /// True when the error means the peer went away rather than misbehaved
    pub fn is_disconnect(&self) -> bool {
        match self {
            ShareError::StreamClosed => true,
            ShareError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}
