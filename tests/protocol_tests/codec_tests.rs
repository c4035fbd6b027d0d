//! Codec Tests
//!
//! Tests for the wire primitives and command/status encoding.

use std::io::{Cursor, Read};

use fileshare::protocol::{
    Command, CommandCode, Status,
    encode_command, read_command, write_command,
    read_status, write_status,
    read_byte, write_byte,
    read_text, write_text,
    read_blob_len, write_blob, copy_blob, read_blob,
    MAX_TEXT_LEN,
};
use fileshare::ShareError;

// =============================================================================
// Helpers
// =============================================================================

/// Reader that hands out at most `chunk` bytes per call
struct Trickle {
    data: Cursor<Vec<u8>>,
    chunk: usize,
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.data.read(&mut buf[..n])
    }
}

fn blob_bytes(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    write_blob(&mut out, content).unwrap();
    out
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_commands_exact_bytes() {
    assert_eq!(&encode_command(&Command::List).unwrap()[..], &[1]);
    assert_eq!(&encode_command(&Command::Get { number: 3 }).unwrap()[..], &[2, 3]);
    assert_eq!(&encode_command(&Command::Remove { number: -1 }).unwrap()[..], &[3, 0xFF]);
    assert_eq!(&encode_command(&Command::Exit).unwrap()[..], &[5]);

    let add = encode_command(&Command::Add { name: "a.txt".to_string() }).unwrap();
    assert_eq!(&add[..], &[4, 0, 5, b'a', b'.', b't', b'x', b't']);
}

#[test]
fn test_read_command_each_kind() {
    let mut wire = Vec::new();
    write_command(&mut wire, &Command::List).unwrap();
    write_command(&mut wire, &Command::Get { number: 7 }).unwrap();
    write_command(&mut wire, &Command::Remove { number: 2 }).unwrap();
    write_command(&mut wire, &Command::Add { name: "notes.md".to_string() }).unwrap();
    write_command(&mut wire, &Command::Exit).unwrap();

    let mut cursor = Cursor::new(wire);
    assert_eq!(read_command(&mut cursor).unwrap(), Command::List);
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Get { number: 7 });
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Remove { number: 2 });
    assert_eq!(
        read_command(&mut cursor).unwrap(),
        Command::Add { name: "notes.md".to_string() }
    );
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Exit);
}

#[test]
fn test_read_command_unknown_byte() {
    for byte in [0u8, 6, 9, 0xFF] {
        let mut cursor = Cursor::new(vec![byte]);
        match read_command(&mut cursor) {
            Err(ShareError::UnknownCommand(b)) => assert_eq!(b, byte as i8),
            other => panic!("Expected UnknownCommand, got {:?}", other),
        }
    }
}

#[test]
fn test_read_command_empty_stream_is_stream_closed() {
    let mut cursor = Cursor::new(Vec::new());
    let err = read_command(&mut cursor).unwrap_err();
    assert!(matches!(err, ShareError::StreamClosed));
    assert!(err.is_disconnect());
}

#[test]
fn test_read_command_get_missing_number() {
    let mut cursor = Cursor::new(vec![2]);
    assert!(matches!(read_command(&mut cursor), Err(ShareError::StreamClosed)));
}

#[test]
fn test_command_code_matches_command() {
    assert_eq!(Command::List.code(), CommandCode::List);
    assert_eq!(Command::Get { number: 1 }.code() as i8, 2);
    assert_eq!(Command::Remove { number: 1 }.code() as i8, 3);
    assert_eq!(Command::Add { name: String::new() }.code() as i8, 4);
    assert_eq!(CommandCode::from_byte(5).unwrap(), CommandCode::Exit);
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_status_bytes() {
    let mut wire = Vec::new();
    write_status(&mut wire, Status::Error).unwrap();
    write_status(&mut wire, Status::AllOk).unwrap();
    assert_eq!(wire, vec![0xFF, 0x00]);

    let mut cursor = Cursor::new(wire);
    assert_eq!(read_status(&mut cursor).unwrap(), Status::Error);
    assert_eq!(read_status(&mut cursor).unwrap(), Status::AllOk);
}

#[test]
fn test_status_unknown_byte() {
    let mut cursor = Cursor::new(vec![7]);
    assert!(matches!(read_status(&mut cursor), Err(ShareError::UnknownStatus(7))));
}

#[test]
fn test_byte_is_signed() {
    let mut wire = Vec::new();
    write_byte(&mut wire, -128).unwrap();
    write_byte(&mut wire, 127).unwrap();
    assert_eq!(wire, vec![0x80, 0x7F]);

    let mut cursor = Cursor::new(wire);
    assert_eq!(read_byte(&mut cursor).unwrap(), -128);
    assert_eq!(read_byte(&mut cursor).unwrap(), 127);
}

// =============================================================================
// Text Tests
// =============================================================================

#[test]
fn test_text_length_counts_utf8_bytes() {
    let mut wire = Vec::new();
    write_text(&mut wire, "héllo").unwrap();
    assert_eq!(&wire[..2], &[0, 6]);

    let mut cursor = Cursor::new(wire);
    assert_eq!(read_text(&mut cursor).unwrap(), "héllo");
}

#[test]
fn test_text_empty() {
    let mut wire = Vec::new();
    write_text(&mut wire, "").unwrap();
    assert_eq!(wire, vec![0, 0]);
    assert_eq!(read_text(&mut Cursor::new(wire)).unwrap(), "");
}

#[test]
fn test_text_at_limit_and_over() {
    let max = "x".repeat(MAX_TEXT_LEN);
    let mut wire = Vec::new();
    write_text(&mut wire, &max).unwrap();
    assert_eq!(&wire[..2], &[0xFF, 0xFF]);

    let over = "x".repeat(MAX_TEXT_LEN + 1);
    let mut wire = Vec::new();
    assert!(matches!(write_text(&mut wire, &over), Err(ShareError::Protocol(_))));
    assert!(wire.is_empty());
}

#[test]
fn test_text_invalid_utf8() {
    let mut cursor = Cursor::new(vec![0, 2, 0xC3, 0x28]);
    assert!(matches!(read_text(&mut cursor), Err(ShareError::Protocol(_))));
}

#[test]
fn test_text_truncated() {
    let mut cursor = Cursor::new(vec![0, 10, b'a', b'b']);
    assert!(matches!(read_text(&mut cursor), Err(ShareError::StreamClosed)));
}

// =============================================================================
// Blob Tests
// =============================================================================

#[test]
fn test_blob_header_is_u64_big_endian() {
    let wire = blob_bytes(b"abc");
    assert_eq!(&wire[..8], &[0, 0, 0, 0, 0, 0, 0, 3]);
    assert_eq!(&wire[8..], b"abc");
    assert_eq!(read_blob_len(&mut Cursor::new(wire)).unwrap(), 3);
}

#[test]
fn test_copy_blob_reassembles_small_chunks() {
    let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let mut reader = Trickle {
        data: Cursor::new(blob_bytes(&content)),
        chunk: 3,
    };

    let mut sink = Vec::new();
    let len = copy_blob(&mut reader, &mut sink, 64).unwrap();

    assert_eq!(len, 5000);
    assert_eq!(sink, content);
}

#[test]
fn test_copy_blob_stops_at_declared_length() {
    let mut wire = blob_bytes(b"payload");
    write_command(&mut wire, &Command::List).unwrap();

    let mut cursor = Cursor::new(wire);
    let mut sink = Vec::new();
    copy_blob(&mut cursor, &mut sink, 2).unwrap();

    assert_eq!(sink, b"payload");
    assert_eq!(read_command(&mut cursor).unwrap(), Command::List);
}

#[test]
fn test_copy_blob_truncated_keeps_partial_data() {
    let mut wire = blob_bytes(b"0123456789");
    wire.truncate(8 + 4);

    let mut sink = Vec::new();
    let err = copy_blob(&mut Cursor::new(wire), &mut sink, 1024).unwrap_err();

    assert!(matches!(err, ShareError::StreamClosed));
    assert_eq!(sink, b"0123");
}

#[test]
fn test_read_blob_empty() {
    let wire = blob_bytes(&[]);
    assert!(read_blob(&mut Cursor::new(wire)).unwrap().is_empty());
}

#[test]
fn test_read_blob_binary_data() {
    let content: Vec<u8> = (0..=255).collect();
    let wire = blob_bytes(&content);
    assert_eq!(read_blob(&mut Cursor::new(wire)).unwrap(), content);
}
