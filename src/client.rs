//! Client
//!
//! Connection factory for the queue service.
//!
//! Each session gets its own TCP connection. Scale out by opening more
//! sessions, not by sharing one across threads.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{FmpqError, Result};
use crate::network::Connection;
use crate::queue::{QueueOptions, QueueSession};

/// Entry point for talking to a FireMPQ server
#[derive(Debug, Clone)]
pub struct FireMpqClient {
    config: ClientConfig,

    /// Version reported by the server on the probe connection
    version: String,
}

impl FireMpqClient {
    /// Check that the service is reachable and record its version
    ///
    /// Opens one probe connection, reads the greeting and closes it again.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let probe = QueueSession::new(open_connection(&config)?);
        let version = probe.server_version().to_string();
        probe.close()?;

        tracing::info!("Connected to {} (server {})", config.server_addr, version);

        Ok(Self { config, version })
    }

    /// Server version captured by `connect`
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// New connection with no queue selected
    pub fn open_session(&self) -> Result<QueueSession<TcpStream>> {
        let conn = open_connection(&self.config)?;
        if conn.version() != self.version {
            tracing::warn!(
                "Server version changed from {} to {}",
                self.version,
                conn.version()
            );
        }
        Ok(QueueSession::new(conn))
    }

    /// New connection bound to an existing queue
    pub fn open_queue(&self, queue: &str) -> Result<QueueSession<TcpStream>> {
        let mut session = self.open_session()?;
        session.set_context(queue)?;
        Ok(session)
    }

    /// New connection bound to a freshly created queue
    pub fn create_queue(
        &self,
        queue: &str,
        options: &QueueOptions,
    ) -> Result<QueueSession<TcpStream>> {
        let mut session = self.open_session()?;
        session.create_queue(queue, options)?;
        Ok(session)
    }
}

/// Dial the server, apply socket options and read the greeting
fn open_connection(config: &ClientConfig) -> Result<Connection<TcpStream>> {
    let stream = dial(config)?;

    // Disable Nagle's algorithm for low latency
    stream.set_nodelay(config.nodelay)?;

    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    match Connection::handshake_with_capacity(config.recv_buffer_size, stream) {
        Ok(conn) => Ok(conn),
        Err(e) => {
            tracing::warn!("Handshake with {} failed: {}", config.server_addr, e);
            Err(e)
        }
    }
}

fn dial(config: &ClientConfig) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = config.server_addr.to_socket_addrs()?.collect();
    if addrs.is_empty() {
        return Err(FmpqError::Config(format!(
            "{} did not resolve to any address",
            config.server_addr
        )));
    }

    let mut last_err = None;
    for addr in addrs {
        let attempt = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))
        } else {
            TcpStream::connect(addr)
        };
        match attempt {
            Ok(stream) => {
                tracing::debug!("Connected to {}", addr);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .map(FmpqError::from)
        .unwrap_or_else(|| FmpqError::Config("no address to connect to".to_string())))
}
