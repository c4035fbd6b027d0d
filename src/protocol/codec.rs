//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Cmd (1)  │ Payload (depends on command)            │
//! └──────────┴─────────────────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - LIST:   empty
//! - GET:    number (1)
//! - REMOVE: number (1)
//! - ADD:    name_len (2) + name, then content_len (8) + content
//! - EXIT:   empty
//!
//! Every read of a declared length either returns exactly that many bytes
//! or fails with [`ShareError::StreamClosed`]. Nothing is truncated.

use std::io::{self, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, ShareError};
use super::{Command, CommandCode, Status};

/// Longest text a u16 length prefix can describe
pub const MAX_TEXT_LEN: usize = u16::MAX as usize;

/// Chunk size used by [`read_blob`] when collecting into memory
const COLLECT_CHUNK: usize = 8 * 1024;

// =============================================================================
// Primitive helpers
// =============================================================================

/// `read_exact` with end-of-stream reported as `StreamClosed`
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ShareError::StreamClosed,
        _ => ShareError::Io(e),
    })
}

/// Read one signed byte
pub fn read_byte<R: Read>(reader: &mut R) -> Result<i8> {
    let mut byte = [0u8; 1];
    fill(reader, &mut byte)?;
    Ok(i8::from_be_bytes(byte))
}

/// Write one signed byte
pub fn write_byte<W: Write>(writer: &mut W, value: i8) -> Result<()> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

/// Append a length-prefixed text to a buffer
pub fn put_text(buf: &mut BytesMut, text: &str) -> Result<()> {
    let len = u16::try_from(text.len()).map_err(|_| {
        ShareError::Protocol(format!(
            "Text too long: {} bytes (max {})",
            text.len(),
            MAX_TEXT_LEN
        ))
    })?;
    buf.reserve(2 + text.len());
    buf.put_u16(len);
    buf.put_slice(text.as_bytes());
    Ok(())
}

/// Read a length-prefixed UTF-8 text
pub fn read_text<R: Read>(reader: &mut R) -> Result<String> {
    let mut len = [0u8; 2];
    fill(reader, &mut len)?;
    let len = u16::from_be_bytes(len) as usize;

    let mut bytes = vec![0u8; len];
    fill(reader, &mut bytes)?;

    String::from_utf8(bytes)
        .map_err(|e| ShareError::Protocol(format!("Text is not valid UTF-8: {}", e)))
}

/// Write a length-prefixed UTF-8 text
pub fn write_text<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let mut buf = BytesMut::new();
    put_text(&mut buf, text)?;
    writer.write_all(&buf)?;
    Ok(())
}

// =============================================================================
// Blob helpers
// =============================================================================

/// Read the 8-byte length that opens a blob
pub fn read_blob_len<R: Read>(reader: &mut R) -> Result<u64> {
    let mut len = [0u8; 8];
    fill(reader, &mut len)?;
    Ok(u64::from_be_bytes(len))
}

/// Write a whole blob (length + content)
pub fn write_blob<W: Write>(writer: &mut W, data: &[u8]) -> Result<()> {
    writer.write_all(&(data.len() as u64).to_be_bytes())?;
    writer.write_all(data)?;
    Ok(())
}

/// Stream a blob from `reader` into `sink` through a fixed-size buffer
///
/// Reads the length prefix, then moves exactly that many bytes, however
/// they are chunked on the stream. Returns the blob length. If the stream
/// ends early, whatever was already written to `sink` stays there.
pub fn copy_blob<R: Read, W: Write>(
    reader: &mut R,
    sink: &mut W,
    buffer_size: usize,
) -> Result<u64> {
    let len = read_blob_len(reader)?;
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut remaining = len;

    while remaining > 0 {
        let want = remaining.min(buffer.len() as u64) as usize;
        let read = match reader.read(&mut buffer[..want]) {
            Ok(0) => return Err(ShareError::StreamClosed),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        sink.write_all(&buffer[..read])?;
        remaining -= read as u64;
    }

    Ok(len)
}

/// Read a whole blob into memory
///
/// Grows with the data actually received instead of trusting the declared
/// length for the allocation.
pub fn read_blob<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    copy_blob(reader, &mut content, COLLECT_CHUNK)?;
    Ok(content)
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command header to bytes
///
/// For ADD this is only the code and the name; the content blob is
/// written after it.
pub fn encode_command(command: &Command) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(2);
    buf.put_i8(command.code() as i8);

    match command {
        Command::Get { number } | Command::Remove { number } => buf.put_i8(*number),
        Command::Add { name } => put_text(&mut buf, name)?,
        Command::List | Command::Exit => {}
    }

    Ok(buf.freeze())
}

/// Write a command header to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a command header from a stream
///
/// Blocks until the code and its fixed payload are received. For ADD the
/// content blob is left on the stream.
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let code = CommandCode::from_byte(read_byte(reader)?)?;

    let command = match code {
        CommandCode::List => Command::List,
        CommandCode::Get => Command::Get {
            number: read_byte(reader)?,
        },
        CommandCode::Remove => Command::Remove {
            number: read_byte(reader)?,
        },
        CommandCode::Add => Command::Add {
            name: read_text(reader)?,
        },
        CommandCode::Exit => Command::Exit,
    };

    Ok(command)
}

// =============================================================================
// Status Encoding/Decoding
// =============================================================================

/// Write a status byte
pub fn write_status<W: Write>(writer: &mut W, status: Status) -> Result<()> {
    write_byte(writer, status as i8)
}

/// Read a status byte
pub fn read_status<R: Read>(reader: &mut R) -> Result<Status> {
    Status::from_byte(read_byte(reader)?)
}
