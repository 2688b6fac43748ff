//! Connection
//!
//! One transport plus the token reader bound to it, past the greeting.

use bytes::Bytes;

use super::Transport;
use crate::error::Result;
use crate::protocol::{decode_hello, write_command, Command, TokenReader, DEFAULT_RECV_BUFFER_SIZE};

/// A greeted connection to the queue service
///
/// Carries one request/response exchange at a time. Not reentrant: the
/// reader's receive window is mutated in place.
pub struct Connection<T: Transport> {
    /// Token reader, owning the transport
    reader: TokenReader<T>,

    /// Version string from the `+HELLO` greeting
    version: String,
}

impl<T: Transport> Connection<T> {
    /// Read the greeting with the default receive window
    pub fn handshake(transport: T) -> Result<Self> {
        Self::handshake_with_capacity(DEFAULT_RECV_BUFFER_SIZE, transport)
    }

    /// Read the greeting line and capture the server version
    ///
    /// Anything other than exactly `+HELLO <version>` fails the handshake.
    pub fn handshake_with_capacity(capacity: usize, transport: T) -> Result<Self> {
        let mut reader = TokenReader::with_capacity(capacity, transport);
        let greeting = reader.read_line()?;
        let version = decode_hello(&greeting)?;

        tracing::debug!("Handshake complete, server version {}", version);

        Ok(Self { reader, version })
    }

    /// Server version reported in the greeting
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Write one request line and flush it
    pub fn send(&mut self, command: &Command<'_>) -> Result<()> {
        tracing::trace!("Sending {}", command.keyword());
        write_command(self.reader.get_mut(), command)
    }

    /// Read one reply line
    pub fn read_line(&mut self) -> Result<Vec<Bytes>> {
        self.reader.read_line()
    }

    /// Send a request and read the first line of its reply
    pub fn request(&mut self, command: &Command<'_>) -> Result<Vec<Bytes>> {
        self.send(command)?;
        let reply = self.read_line()?;
        tracing::trace!("{} answered with {} tokens", command.keyword(), reply.len());
        Ok(reply)
    }

    /// Token reader, for replies spanning several lines
    pub fn reader_mut(&mut self) -> &mut TokenReader<T> {
        &mut self.reader
    }

    pub fn transport(&self) -> &T {
        self.reader.get_ref()
    }

    pub fn into_transport(self) -> T {
        self.reader.into_inner()
    }

    /// Close the underlying transport
    pub fn close(mut self) -> Result<()> {
        self.reader.get_mut().close()?;
        Ok(())
    }
}
