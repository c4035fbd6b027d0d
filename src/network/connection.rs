//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, ShareError};
use crate::protocol::{copy_blob, read_command, write_blob, write_status, write_text, Command, Status};
use crate::registry::{base_name, AddOutcome, FileEntry, FileRegistry};

/// Name prefix of uploads still in flight
const UPLOAD_PREFIX: &str = ".upload-";

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Registry shared with every other connection
    registry: Arc<FileRegistry>,

    /// Where uploads are written
    files_dir: PathBuf,

    /// Chunk size for streaming uploads to disk
    buffer_size: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, registry: Arc<FileRegistry>, config: &Config) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            registry,
            files_dir: config.files_dir.clone(),
            buffer_size: config.transfer_buffer_size,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves the socket blocking forever)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends replies. Returns when the client
    /// sends EXIT, sends an unknown command, or the stream breaks.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} disconnected: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(ShareError::UnknownCommand(byte)) => {
                    tracing::debug!(
                        "Unknown command {} from {}, closing connection",
                        byte,
                        self.peer_addr
                    );
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);

            let result = match command {
                Command::List => self.send_listing(),
                Command::Get { number } => self.send_file(number),
                Command::Remove { number } => self.remove_file(number),
                Command::Add { name } => self.receive_file(&name),
                Command::Exit => {
                    tracing::debug!("Client {} exited", self.peer_addr);
                    return Ok(());
                }
            };

            if let Err(e) = result.and_then(|()| self.writer.flush().map_err(ShareError::from)) {
                if e.is_disconnect() {
                    tracing::debug!(
                        "Client {} disconnected mid-request: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
                tracing::warn!("Error serving {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// LIST: one text with every `"<number>. <name>\n"` line
    fn send_listing(&mut self) -> Result<()> {
        let listing = self.registry.listing();
        write_text(&mut self.writer, &listing)
    }

    /// GET: status, then name and content when the number is valid
    fn send_file(&mut self, number: i8) -> Result<()> {
        let entry = match self.registry.get(i64::from(number)) {
            Ok(entry) => entry,
            Err(ShareError::NotFound { .. }) => {
                tracing::debug!("{} requested missing file {}", self.peer_addr, number);
                return write_status(&mut self.writer, Status::Error);
            }
            Err(e) => return Err(e),
        };

        // The sender already knows the size, so the whole file is loaded
        let content = match entry.read_content() {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", entry.path().display(), e);
                return write_status(&mut self.writer, Status::Error);
            }
        };

        write_status(&mut self.writer, Status::AllOk)?;
        write_text(&mut self.writer, entry.name())?;
        write_blob(&mut self.writer, &content)?;

        tracing::debug!(
            "Sent {} ({} bytes) to {}",
            entry.name(),
            content.len(),
            self.peer_addr
        );
        Ok(())
    }

    /// REMOVE: status only
    fn remove_file(&mut self, number: i8) -> Result<()> {
        let status = match self.registry.remove(i64::from(number)) {
            Ok(_) => Status::AllOk,
            Err(ShareError::NotFound { .. }) => Status::Error,
            Err(e) => return Err(e),
        };
        write_status(&mut self.writer, status)
    }

    /// ADD: stream the blob to disk, register it, reply ALL_OK
    ///
    /// The blob is staged in a temporary file next to its destination and
    /// renamed over it only once complete, so concurrent uploads of one
    /// name never interleave and readers never see a half-written file.
    /// A broken transfer leaves the destination untouched. A duplicate
    /// upload replaces the file on disk but leaves the registry untouched;
    /// the client sees ALL_OK either way.
    fn receive_file(&mut self, name: &str) -> Result<()> {
        let Some(base) = base_name(name).map(str::to_owned) else {
            tracing::warn!("Rejecting upload with unusable name {:?} from {}", name, self.peer_addr);
            copy_blob(&mut self.reader, &mut io::sink(), self.buffer_size)?;
            return write_status(&mut self.writer, Status::Error);
        };

        let path = self.files_dir.join(&base);
        let mut staged = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .tempfile_in(&self.files_dir)?;
        let size = copy_blob(&mut self.reader, staged.as_file_mut(), self.buffer_size)?;
        staged.as_file_mut().flush()?;
        staged.persist(&path).map_err(|e| e.error)?;

        match self.registry.add(FileEntry::new(base, size, path)) {
            AddOutcome::Added { number } => {
                tracing::debug!("Upload from {} registered as {}", self.peer_addr, number);
            }
            AddOutcome::DuplicateSkipped => {
                tracing::debug!("Upload from {} was a duplicate", self.peer_addr);
            }
        }

        write_status(&mut self.writer, Status::AllOk)
    }
}
