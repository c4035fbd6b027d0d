//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! There is no envelope: every message is a raw concatenation of three
//! primitives.
//!
//! ### Primitives
//! ```text
//! Byte:  ┌──────────┐
//!        │ i8 (1)   │
//!        └──────────┘
//! Text:  ┌──────────┬─────────────────────────────┐
//!        │ Len (2)  │         UTF-8 bytes         │
//!        └──────────┴─────────────────────────────┘
//! Blob:  ┌──────────┬─────────────────────────────┐
//!        │ Len (8)  │         raw bytes           │
//!        └──────────┴─────────────────────────────┘
//! ```
//! All lengths are big-endian and unsigned.
//!
//! ### Commands (client → server)
//! - 1: LIST   - Payload: none             → Reply: Text listing
//! - 2: GET    - Payload: Byte number      → Reply: status, then Text name + Blob
//! - 3: REMOVE - Payload: Byte number      → Reply: status
//! - 4: ADD    - Payload: Text name + Blob → Reply: status
//! - 5: EXIT   - Payload: none             → no reply, connection closes
//!
//! ### Status Codes (server → client)
//! - -1: ERROR
//! -  0: ALL_OK
//!
//! File numbers are 1-based positions in the current listing. They shift
//! when earlier entries are removed, so a number read from one LIST can name
//! a different file by the time it is used.

mod command;
mod status;
mod codec;

pub use command::{Command, CommandCode};
pub use status::Status;
pub use codec::{
    encode_command, read_command, write_command,
    read_status, write_status,
    read_byte, write_byte,
    read_text, write_text, put_text,
    read_blob_len, write_blob, copy_blob, read_blob,
    MAX_TEXT_LEN,
};
