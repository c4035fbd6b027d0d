//! Client Driver
//!
//! Issues the five protocol operations from the other end of a connection.
//!
//! A single `Client` is one session: it is not safe to interleave requests
//! from several threads, and every call blocks until its reply is read.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShareError};
use crate::protocol::{
    copy_blob, encode_command, read_blob, read_status, read_text, write_blob, write_command,
    Command, Status,
};
use crate::registry::base_name;

/// Default chunk size for streaming downloads to disk
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// A file saved locally by [`Client::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Name the server reported
    pub name: String,

    /// Where the content was written
    pub path: PathBuf,

    /// Bytes written
    pub size: u64,
}

/// Blocking client for a fileshare server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    buffer_size: usize,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            buffer_size: DEFAULT_BUFFER_SIZE,
        })
    }

    /// Set the chunk size used when writing downloads to disk
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// LIST as the raw text the server sends
    pub fn list(&mut self) -> Result<String> {
        write_command(&mut self.writer, &Command::List)?;
        read_text(&mut self.reader)
    }

    /// LIST parsed into `(number, name)` pairs
    pub fn list_entries(&mut self) -> Result<Vec<(usize, String)>> {
        let listing = self.list()?;
        listing
            .lines()
            .map(|line| {
                line.split_once(". ")
                    .and_then(|(number, name)| {
                        number.parse().ok().map(|n| (n, name.to_string()))
                    })
                    .ok_or_else(|| {
                        ShareError::Protocol(format!("Malformed listing line: {:?}", line))
                    })
            })
            .collect()
    }

    /// GET a file and stream it into `dest_dir`
    ///
    /// Returns `Ok(None)` when the server has no file with that number. A
    /// transfer cut short leaves a partial file behind.
    pub fn get(&mut self, number: i8, dest_dir: &Path) -> Result<Option<Download>> {
        write_command(&mut self.writer, &Command::Get { number })?;
        if read_status(&mut self.reader)? == Status::Error {
            return Ok(None);
        }

        let name = read_text(&mut self.reader)?;
        let Some(base) = base_name(&name) else {
            copy_blob(&mut self.reader, &mut io::sink(), self.buffer_size)?;
            return Err(ShareError::Protocol(format!(
                "Server sent unusable file name {:?}",
                name
            )));
        };

        let path = dest_dir.join(base);
        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                // Keep the session in step before reporting
                copy_blob(&mut self.reader, &mut io::sink(), self.buffer_size)?;
                return Err(e.into());
            }
        };
        let size = copy_blob(&mut self.reader, &mut file, self.buffer_size)?;
        file.flush()?;

        Ok(Some(Download { name, path, size }))
    }

    /// GET a file into memory as `(name, content)`
    pub fn fetch(&mut self, number: i8) -> Result<Option<(String, Vec<u8>)>> {
        write_command(&mut self.writer, &Command::Get { number })?;
        if read_status(&mut self.reader)? == Status::Error {
            return Ok(None);
        }

        let name = read_text(&mut self.reader)?;
        let content = read_blob(&mut self.reader)?;
        Ok(Some((name, content)))
    }

    /// REMOVE a file by number
    pub fn remove(&mut self, number: i8) -> Result<Status> {
        write_command(&mut self.writer, &Command::Remove { number })?;
        read_status(&mut self.reader)
    }

    /// ADD a local file, sent under its base name
    pub fn add(&mut self, path: &Path) -> Result<Status> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ShareError::Protocol(format!("{} has no usable file name", path.display()))
            })?
            .to_string();
        let content = fs::read(path)?;
        self.add_bytes(&name, &content)
    }

    /// ADD in-memory content under `name`
    ///
    /// `ALL_OK` does not distinguish a new file from a duplicate.
    pub fn add_bytes(&mut self, name: &str, content: &[u8]) -> Result<Status> {
        let header = encode_command(&Command::Add {
            name: name.to_string(),
        })?;
        self.writer.write_all(&header)?;
        write_blob(&mut self.writer, content)?;
        self.writer.flush()?;
        read_status(&mut self.reader)
    }

    /// Send EXIT and close the connection
    pub fn exit(mut self) -> Result<()> {
        write_command(&mut self.writer, &Command::Exit)?;
        self.writer.get_ref().shutdown(Shutdown::Both)?;
        Ok(())
    }
}
