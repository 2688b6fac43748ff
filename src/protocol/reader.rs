//! Token reader
//!
//! Incremental tokenizer that turns a byte stream into reply lines.
//!
//! ## Token Rules
//! - Text token: a run of printable ASCII bytes (0x21..=0x7E)
//! - Any other byte ends the current text token; a line feed also ends the line
//! - A text token `$N` is not returned, it announces that the next N raw
//!   bytes form one binary token (spaces, line feeds and NULs included)
//!
//! ```text
//! +MSGS *1 %2 ID $5 id-01 PL $6 a b\nc POPCNT :0\n
//!                      └────┘     └─────┘ raw bytes, copied verbatim
//! ```

use std::io::{ErrorKind, Read};

use bytes::{BufMut, Bytes, BytesMut};

use super::wire;
use crate::error::{FmpqError, Result};

/// Default size of the receive window (4 KB)
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 4096;

/// Initial capacity for a text token
const INIT_TOKEN_CAPACITY: usize = 48;

const LINE_FEED: u8 = 0x0A;

#[inline]
fn is_printable(byte: u8) -> bool {
    (0x21..=0x7E).contains(&byte)
}

/// Parse mode of the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Binary,
}

/// Reads reply lines from a byte source
///
/// The reader owns its source the way `BufReader` does. Bytes that arrive
/// after the end of a line stay buffered for the next call.
pub struct TokenReader<R> {
    /// Underlying byte source
    inner: R,

    /// Receive window, reused across reads
    buf: Box<[u8]>,

    /// Read cursor into `buf`
    pos: usize,

    /// Number of valid bytes in `buf`
    len: usize,

    /// Token being assembled
    token: BytesMut,

    mode: Mode,

    /// Bytes still owed to the current binary token
    remaining: usize,
}

impl<R: Read> TokenReader<R> {
    /// Create a reader with the default receive window
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_RECV_BUFFER_SIZE, inner)
    }

    /// Create a reader with a receive window of `capacity` bytes
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            token: BytesMut::with_capacity(INIT_TOKEN_CAPACITY),
            mode: Mode::Text,
            remaining: 0,
        }
    }

    /// Read one complete reply line
    ///
    /// Blocks on the source until a line feed outside of any binary token is
    /// seen. A read error or end of stream discards the partial line.
    pub fn read_line(&mut self) -> Result<Vec<Bytes>> {
        self.mode = Mode::Text;
        self.remaining = 0;
        self.token.clear();

        let mut line = Vec::with_capacity(4);

        loop {
            if self.pos >= self.len {
                self.fill()?;
            }

            while self.pos < self.len {
                if self.mode == Mode::Binary {
                    let take = self.remaining.min(self.len - self.pos);
                    self.token
                        .extend_from_slice(&self.buf[self.pos..self.pos + take]);
                    self.pos += take;
                    self.remaining -= take;

                    if self.remaining == 0 {
                        line.push(self.token.split().freeze());
                        self.mode = Mode::Text;
                    }
                    continue;
                }

                let byte = self.buf[self.pos];
                self.pos += 1;

                if is_printable(byte) {
                    self.token.put_u8(byte);
                } else if !self.token.is_empty() {
                    if self.token[0] == b'$' {
                        let len = wire::decode_binary_len(&self.token[1..])?;
                        self.token.clear();
                        self.token.reserve(len);
                        self.remaining = len;
                        self.mode = Mode::Binary;
                    } else {
                        line.push(self.token.split().freeze());
                        if byte == LINE_FEED {
                            return Ok(line);
                        }
                    }
                } else if byte == LINE_FEED {
                    return Ok(line);
                }
            }
        }
    }

    /// Refill the receive window with one read from the source
    fn fill(&mut self) -> Result<()> {
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(0) => return Err(FmpqError::ConnectionClosed),
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R> TokenReader<R> {
    /// Number of received bytes not yet consumed
    pub fn buffered(&self) -> usize {
        self.len - self.pos
    }

    /// Size of the receive window
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the source, used for writing requests
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
