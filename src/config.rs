//! Configuration for fileshare
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, ShareError};

/// Main configuration for a fileshare server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory scanned (recursively) into the registry at startup.
    /// Uploaded files are written here by base name.
    pub files_dir: PathBuf,

    /// Chunk size used when streaming a received blob to disk (bytes)
    pub transfer_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from("./ServerFiles"),
            transfer_buffer_size: 1024,
            listen_addr: "0.0.0.0:5000".to_string(),
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that would make the server unusable
    pub fn validate(&self) -> Result<()> {
        if self.transfer_buffer_size == 0 {
            return Err(ShareError::Config(
                "transfer buffer size must be greater than zero".to_string(),
            ));
        }
        if self.listen_addr.is_empty() {
            return Err(ShareError::Config("listen address is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the seed / upload directory
    pub fn files_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.files_dir = path.into();
        self
    }

    /// Set the streaming chunk size (in bytes)
    pub fn transfer_buffer_size(mut self, size: usize) -> Self {
        self.config.transfer_buffer_size = size;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
