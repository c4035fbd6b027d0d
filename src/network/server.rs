//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::error::{Result, ShareError};
use crate::registry::FileRegistry;

use super::Connection;

/// TCP server for fileshare
pub struct Server {
    config: Config,
    registry: Arc<FileRegistry>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Seed the registry from `config.files_dir` and bind the listener
    ///
    /// Any failure here is a startup failure: the process should not run.
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let registry = FileRegistry::scan(&config.files_dir).map_err(|e| match e {
            ShareError::Startup(_) => e,
            other => ShareError::Startup(format!(
                "failed to read seed directory '{}': {}",
                config.files_dir.display(),
                other
            )),
        })?;
        tracing::info!(
            "Loaded {} files from {}",
            registry.len(),
            config.files_dir.display()
        );

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            ShareError::Startup(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared registry handle
    pub fn registry(&self) -> Arc<FileRegistry> {
        Arc::clone(&self.registry)
    }

    /// Handle that can stop [`run`](Self::run) from another thread
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr: connectable(self.local_addr()?),
        })
    }

    /// Start the server (blocking)
    ///
    /// Accepts until shut down through a [`ShutdownHandle`]. An `accept`
    /// failure ends the loop with an error; there is no retry.
    pub fn run(&self) -> Result<()> {
        tracing::info!("Server running on {}", self.local_addr()?);

        loop {
            let (stream, peer) = self.listener.accept()?;

            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested, leaving accept loop");
                return Ok(());
            }

            self.spawn_handler(stream, peer)?;
        }
    }

    fn spawn_handler(&self, stream: TcpStream, peer: SocketAddr) -> Result<()> {
        let registry = Arc::clone(&self.registry);
        let config = self.config.clone();

        thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                let mut connection = match Connection::new(stream, registry, &config) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!("Failed to set up connection from {}: {}", peer, e);
                        return;
                    }
                };
                if let Err(e) =
                    connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)
                {
                    tracing::warn!("Failed to set timeouts for {}: {}", peer, e);
                    return;
                }
                if let Err(e) = connection.handle() {
                    tracing::warn!("Connection {} closed with error: {}", peer, e);
                }
                tracing::debug!("Connection {} released", peer);
            })?;

        Ok(())
    }
}

/// Stops a running [`Server`] from outside its accept loop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Signal the server to stop accepting
    ///
    /// Connections already being served keep running until their clients
    /// leave.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // accept() only returns on a connection, so make one
        let _ = TcpStream::connect(self.wake_addr);
    }
}

/// Map a wildcard bind address to loopback so it can be connected to
fn connectable(mut addr: SocketAddr) -> SocketAddr {
    if addr.ip().is_unspecified() {
        let loopback: IpAddr = match addr {
            SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
            SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
        };
        addr.set_ip(loopback);
    }
    addr
}
