//! Response decoders
//!
//! Turn reply lines into typed results.
//!
//! ## Reply Shapes
//! ```text
//! +OK
//! +MSG <id>
//! -ERR <code> <description>
//! +MSGS *<n> %<k> KEY VALUE ... %<k> KEY VALUE ...
//! +BATCH <n>            followed by n lines of +MSG <id> or -ERR ...
//! +HELLO <version>      greeting, sent once per connection
//! ```

use std::io::Read;

use bytes::Bytes;

use super::reader::TokenReader;
use super::wire;
use crate::error::{describe_tokens, FmpqError, Result, ServerError};

pub const REPLY_OK: &str = "+OK";
pub const REPLY_MSG: &str = "+MSG";
pub const REPLY_MSGS: &str = "+MSGS";
pub const REPLY_BATCH: &str = "+BATCH";
pub const REPLY_ERR: &str = "-ERR";
pub const REPLY_HELLO: &str = "+HELLO";

const KEY_ID: &[u8] = b"ID";
const KEY_PAYLOAD: &[u8] = b"PL";
const KEY_RECEIPT: &[u8] = b"RCPT";
const KEY_UNLOCK_TS: &[u8] = b"UTS";
const KEY_EXPIRE_TS: &[u8] = b"ETS";
const KEY_POP_COUNT: &[u8] = b"POPCNT";

#[inline]
fn is(token: &[u8], word: &str) -> bool {
    token == word.as_bytes()
}

fn utf8(token: &Bytes, what: &str) -> Result<String> {
    String::from_utf8(token.to_vec())
        .map_err(|_| FmpqError::Protocol(format!("{} is not valid UTF-8", what)))
}

// =============================================================================
// Typed Results
// =============================================================================

/// A message returned by `POP` or `POPLCK`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    id: String,
    payload: Bytes,
    receipt: Option<String>,
    expire_ts: i64,
    unlock_ts: i64,
    pop_count: i64,
}

impl QueueMessage {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Lock receipt, only present on messages popped with a lock
    pub fn receipt(&self) -> Option<&str> {
        self.receipt.as_deref()
    }

    /// Expiration timestamp (ms since epoch)
    pub fn expire_ts(&self) -> i64 {
        self.expire_ts
    }

    /// Lock expiration timestamp (ms since epoch)
    pub fn unlock_ts(&self) -> i64 {
        self.unlock_ts
    }

    /// How many times the message has been popped
    pub fn pop_count(&self) -> i64 {
        self.pop_count
    }
}

/// Outcome of one item of a batched push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItem {
    /// Stored under this id
    Pushed(String),

    /// Rejected by the server
    Failed(ServerError),
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        matches!(self, BatchItem::Pushed(_))
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            BatchItem::Pushed(id) => Some(id),
            BatchItem::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ServerError> {
        match self {
            BatchItem::Pushed(_) => None,
            BatchItem::Failed(e) => Some(e),
        }
    }
}

// =============================================================================
// Errors and Simple Replies
// =============================================================================

/// Decode a `-ERR <code> <description>` line
///
/// Returns `Ok(None)` if the line is not an error reply and a protocol error
/// if it is one but malformed.
pub fn decode_server_error(tokens: &[Bytes]) -> Result<Option<ServerError>> {
    match tokens.first() {
        Some(first) if is(first, REPLY_ERR) => {}
        _ => return Ok(None),
    }

    let malformed = || {
        FmpqError::Protocol(format!(
            "Unexpected error format: {}",
            describe_tokens(tokens)
        ))
    };

    if tokens.len() != 3 {
        return Err(malformed());
    }
    let code = wire::decode_int(&tokens[1]).map_err(|_| malformed())?;
    let description = String::from_utf8_lossy(&tokens[2]).into_owned();

    Ok(Some(ServerError::new(code, description)))
}

/// Error for a line that is not the reply the caller waited for
pub fn reject(tokens: &[Bytes]) -> FmpqError {
    match decode_server_error(tokens) {
        Ok(Some(e)) => FmpqError::Server(e),
        Ok(None) => FmpqError::UnexpectedResponse(describe_tokens(tokens)),
        Err(e) => e,
    }
}

/// Expect a `+OK` reply
pub fn decode_ok(tokens: &[Bytes]) -> Result<()> {
    match tokens.first() {
        Some(first) if is(first, REPLY_OK) => Ok(()),
        _ => Err(reject(tokens)),
    }
}

/// Decode the reply to a single push: `+OK` or `+MSG <id>`
pub fn decode_push(tokens: &[Bytes]) -> Result<Option<String>> {
    match tokens {
        [first, ..] if is(first, REPLY_OK) => Ok(None),
        [first, id] if is(first, REPLY_MSG) => Ok(Some(utf8(id, "message id")?)),
        _ => Err(reject(tokens)),
    }
}

/// Decode the greeting line into the server version
pub fn decode_hello(tokens: &[Bytes]) -> Result<String> {
    match tokens {
        [first, version] if is(first, REPLY_HELLO) => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(FmpqError::Handshake(describe_tokens(tokens))),
    }
}

// =============================================================================
// Message Lists
// =============================================================================

/// Decode a `+MSGS` reply
///
/// Every token after the keyword must be claimed by the array and map
/// headers; missing or leftover tokens are a protocol error.
pub fn decode_messages(tokens: &[Bytes]) -> Result<Vec<QueueMessage>> {
    match tokens.first() {
        Some(first) if is(first, REPLY_MSGS) => {}
        _ => return Err(reject(tokens)),
    }

    let mut iter = tokens[1..].iter();
    let count = wire::decode_array_size(next_token(&mut iter, "array header")?)?;

    let mut messages = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let pairs = wire::decode_map_size(next_token(&mut iter, "map header")?)?;
        messages.push(decode_message(&mut iter, pairs)?);
    }

    let leftover = iter.len();
    if leftover > 0 {
        return Err(FmpqError::Protocol(format!(
            "{} trailing tokens after {} messages",
            leftover, count
        )));
    }

    Ok(messages)
}

fn decode_message(iter: &mut std::slice::Iter<'_, Bytes>, pairs: usize) -> Result<QueueMessage> {
    let mut id = None;
    let mut payload = Bytes::new();
    let mut receipt = None;
    let mut expire_ts = 0;
    let mut unlock_ts = 0;
    let mut pop_count = 0;

    for _ in 0..pairs {
        let key = next_token(iter, "message key")?;
        let value = next_token(iter, "message value")?;

        match &key[..] {
            KEY_ID => id = Some(utf8(value, "message id")?),
            KEY_PAYLOAD => payload = value.clone(),
            KEY_RECEIPT => receipt = Some(utf8(value, "receipt")?),
            KEY_UNLOCK_TS => unlock_ts = wire::decode_int(value)?,
            KEY_EXPIRE_TS => expire_ts = wire::decode_int(value)?,
            KEY_POP_COUNT => pop_count = wire::decode_int(value)?,
            _ => {}
        }
    }

    let id = id.ok_or_else(|| FmpqError::Protocol("message without ID".to_string()))?;

    Ok(QueueMessage {
        id,
        payload,
        receipt,
        expire_ts,
        unlock_ts,
        pop_count,
    })
}

fn next_token<'a>(iter: &mut std::slice::Iter<'a, Bytes>, what: &str) -> Result<&'a Bytes> {
    iter.next()
        .ok_or_else(|| FmpqError::Protocol(format!("reply ended before {}", what)))
}

// =============================================================================
// Batches
// =============================================================================

/// Decode a `+BATCH <n>` header and the n item lines that follow it
///
/// A failed item does not stop decoding of the rest.
pub fn decode_batch<R: Read>(
    header: &[Bytes],
    reader: &mut TokenReader<R>,
) -> Result<Vec<BatchItem>> {
    let count = match header {
        [first, count] if is(first, REPLY_BATCH) => wire::decode_int(count)?,
        _ => return Err(reject(header)),
    };
    if count < 0 {
        return Err(FmpqError::Protocol(format!("negative batch size {}", count)));
    }

    let mut items = Vec::with_capacity((count as usize).min(1024));
    for _ in 0..count {
        let line = reader.read_line()?;
        items.push(decode_batch_item(&line)?);
    }

    Ok(items)
}

fn decode_batch_item(tokens: &[Bytes]) -> Result<BatchItem> {
    if let Some(e) = decode_server_error(tokens)? {
        return Ok(BatchItem::Failed(e));
    }
    match tokens {
        [first, id] if is(first, REPLY_MSG) => Ok(BatchItem::Pushed(utf8(id, "message id")?)),
        _ => Err(FmpqError::Protocol(format!(
            "unexpected batch item: {}",
            describe_tokens(tokens)
        ))),
    }
}
