//! Command definitions
//!
//! Represents commands from clients.

use crate::error::{Result, ShareError};

/// Command selector bytes
///
/// These share their byte space with [`Status`](super::Status) on the wire
/// but are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum CommandCode {
    List = 1,
    Get = 2,
    Remove = 3,
    Add = 4,
    Exit = 5,
}

impl CommandCode {
    /// Parse a command byte
    pub fn from_byte(byte: i8) -> Result<Self> {
        match byte {
            1 => Ok(CommandCode::List),
            2 => Ok(CommandCode::Get),
            3 => Ok(CommandCode::Remove),
            4 => Ok(CommandCode::Add),
            5 => Ok(CommandCode::Exit),
            other => Err(ShareError::UnknownCommand(other)),
        }
    }
}

/// A parsed command header
///
/// `Add` carries only the file name; the content blob follows it on the
/// stream and is consumed separately so it can be streamed to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every file with its current number
    List,

    /// Download a file by number
    Get { number: i8 },

    /// Remove a file from the registry by number
    Remove { number: i8 },

    /// Upload a file (blob follows)
    Add { name: String },

    /// Close the connection
    Exit,
}

impl Command {
    /// Get the command code
    pub fn code(&self) -> CommandCode {
        match self {
            Command::List => CommandCode::List,
            Command::Get { .. } => CommandCode::Get,
            Command::Remove { .. } => CommandCode::Remove,
            Command::Add { .. } => CommandCode::Add,
            Command::Exit => CommandCode::Exit,
        }
    }
}
