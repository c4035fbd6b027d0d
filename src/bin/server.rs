//! fileshare Server Binary
//!
//! Seeds the registry from a directory and serves it over TCP until
//! interrupted.

use std::path::PathBuf;

use clap::Parser;
use fileshare::{Config, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// fileshare Server
#[derive(Parser, Debug)]
#[command(name = "fileshare-server")]
#[command(about = "Share a directory of files over a small TCP protocol")]
#[command(version)]
struct Args {
    /// Port to listen on
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory scanned at startup and used for uploads
    #[arg(short, long, default_value = "./ServerFiles")]
    dir: PathBuf,

    /// Chunk size in bytes for receiving uploads
    #[arg(short, long, default_value = "1024")]
    buffer_size: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fileshare=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("fileshare server v{}", fileshare::VERSION);
    tracing::info!("Files directory: {}", args.dir.display());

    let config = Config::builder()
        .files_dir(&args.dir)
        .listen_addr(format!("{}:{}", args.host, args.port))
        .transfer_buffer_size(args.buffer_size)
        .build();

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::error!(
                "The server seeds its file list from the files directory; make sure it exists."
            );
            std::process::exit(1);
        }
    };

    tracing::info!("Press Control-C to stop the server.");

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
