//! Shared test helpers
//!
//! A scripted in-memory transport that replays server bytes in chosen
//! chunks and records every request the client writes.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use bytes::Bytes;
use firempq::network::{Connection, Transport};
use firempq::protocol::TokenReader;
use firempq::QueueSession;

pub const HELLO: &[u8] = b"+HELLO 0.7.1\n";

// =============================================================================
// Scripted Transport
// =============================================================================

/// Client-side view of what went over the wire
#[derive(Clone, Default)]
pub struct Wire {
    written: Rc<RefCell<Vec<u8>>>,
    closed: Rc<Cell<bool>>,
}

impl Wire {
    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    /// Written bytes as lossy text lines, line feeds stripped
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.written.borrow())
            .split_terminator('\n')
            .map(|s| s.to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.written.borrow_mut().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

/// Replays queued chunks, one chunk (or part of one) per read
pub struct ScriptedTransport {
    chunks: VecDeque<Vec<u8>>,
    wire: Wire,
}

impl ScriptedTransport {
    pub fn new() -> (Self, Wire) {
        let wire = Wire::default();
        let transport = Self {
            chunks: VecDeque::new(),
            wire: wire.clone(),
        };
        (transport, wire)
    }

    /// Queue bytes delivered by a single read
    pub fn chunk(mut self, bytes: &[u8]) -> Self {
        self.chunks.push_back(bytes.to_vec());
        self
    }

    /// Queue bytes split into reads of at most `size` bytes
    pub fn fragmented(mut self, bytes: &[u8], size: usize) -> Self {
        for piece in bytes.chunks(size) {
            self.chunks.push_back(piece.to_vec());
        }
        self
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            let rest = chunk.split_off(n);
            self.chunks.push_front(rest);
        }
        Ok(n)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.wire.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedTransport {
    fn close(&mut self) -> io::Result<()> {
        self.wire.closed.set(true);
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Tokenize one reply line
pub fn tokens(bytes: &[u8]) -> Vec<Bytes> {
    let (transport, _) = ScriptedTransport::new();
    let mut reader = TokenReader::new(transport.chunk(bytes));
    reader.read_line().unwrap()
}

/// Reader over the given bytes, delivered in one read
pub fn reader_over(bytes: &[u8]) -> TokenReader<ScriptedTransport> {
    let (transport, _) = ScriptedTransport::new();
    TokenReader::new(transport.chunk(bytes))
}

/// Unbound session whose server greets and then sends `replies`
pub fn unbound_session(replies: &[u8]) -> (QueueSession<ScriptedTransport>, Wire) {
    let (transport, wire) = ScriptedTransport::new();
    let transport = transport.chunk(HELLO).chunk(replies);
    let conn = Connection::handshake(transport).unwrap();
    (QueueSession::new(conn), wire)
}

/// Session bound to queue `jobs`, request log cleared
pub fn bound_session(replies: &[u8]) -> (QueueSession<ScriptedTransport>, Wire) {
    let mut script = b"+OK\n".to_vec();
    script.extend_from_slice(replies);
    let (mut session, wire) = unbound_session(&script);
    session.set_context("jobs").unwrap();
    wire.clear();
    (session, wire)
}
