//! Status definitions
//!
//! Outcome byte sent by the server for GET, REMOVE and ADD.

use crate::error::{Result, ShareError};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Status {
    Error = -1,
    AllOk = 0,
}

impl Status {
    /// Parse a status byte
    pub fn from_byte(byte: i8) -> Result<Self> {
        match byte {
            -1 => Ok(Status::Error),
            0 => Ok(Status::AllOk),
            other => Err(ShareError::UnknownStatus(other)),
        }
    }
}
