//! Transport
//!
//! The byte stream a session runs over.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// An ordered, reliable, blocking byte stream
///
/// Reads and writes come from `Read` and `Write`; `close` ends the stream.
pub trait Transport: Read + Write {
    /// Close both directions of the stream
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // Already torn down by the peer
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
