//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per accepted connection, no upper bound
//! - Handlers share nothing but the `FileRegistry`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
