//! Command encoder
//!
//! Builds request lines from structured inputs.
//!
//! ## Request Format
//! ```text
//! KEYWORD [ARG]*\n          arguments separated by one space
//!
//! PUSH ID $3 m-1 PRIORITY 5 PL $5 hello\n
//! PUSHB PL $1 a NXT ID $1 b PL $1 b\n
//! POPLCK LIMIT 10 TIMEOUT 30000\n
//! ```
//!
//! Only options that are set are sent; the server applies its own default
//! for anything left out.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use super::wire::{encode_int, encode_string};
use crate::error::Result;
use crate::queue::{PopLockOptions, PopOptions, PushMessage, QueueOptions};

// =============================================================================
// Keywords
// =============================================================================

pub const CMD_CTX: &str = "CTX";
pub const CMD_CRT: &str = "CRT";
pub const CMD_SETCFG: &str = "SETCFG";
pub const CMD_PUSH: &str = "PUSH";
pub const CMD_PUSH_BATCH: &str = "PUSHB";
pub const CMD_POP: &str = "POP";
pub const CMD_POP_LOCK: &str = "POPLCK";
pub const CMD_DELETE_BY_ID: &str = "DEL";
pub const CMD_DELETE_LOCKED_BY_ID: &str = "DELLCK";
pub const CMD_DELETE_BY_RECEIPT: &str = "RDEL";
pub const CMD_UNLOCK_BY_ID: &str = "UNLCK";
pub const CMD_UNLOCK_BY_RECEIPT: &str = "RUNLCK";
pub const CMD_QUIT: &str = "QUIT";

/// Separator between items of a batched push
const BATCH_NEXT: &str = "NXT";

/// Queue type tag sent with `CRT`
const QUEUE_TYPE_PQUEUE: &str = "pqueue";

const PRM_ID: &str = "ID";
const PRM_PRIORITY: &str = "PRIORITY";
const PRM_DELAY: &str = "DELAY";
const PRM_TTL: &str = "TTL";
const PRM_SYNC_WAIT: &str = "SYNCWAIT";
const PRM_PAYLOAD: &str = "PL";
const PRM_LIMIT: &str = "LIMIT";
const PRM_WAIT: &str = "WAIT";
const PRM_LOCK_TIMEOUT: &str = "TIMEOUT";
const PRM_ASYNC: &str = "ASYNC";
const PRM_MSG_TTL: &str = "MSGTTL";
const PRM_MAX_SIZE: &str = "MAXSIZE";
const PRM_POP_LIMIT: &str = "POPLIMIT";

// =============================================================================
// Commands
// =============================================================================

/// A request to the server
#[derive(Debug, Clone, Copy)]
pub enum Command<'a> {
    /// Select an existing queue
    Context { queue: &'a str },

    /// Create a priority queue
    Create {
        queue: &'a str,
        options: &'a QueueOptions,
    },

    /// Reconfigure the selected queue
    SetConfig { options: &'a QueueOptions },

    Push { message: &'a PushMessage },

    /// Several pushes in one request line
    PushBatch { messages: &'a [PushMessage] },

    Pop { options: &'a PopOptions },

    PopLock { options: &'a PopLockOptions },

    DeleteById { id: &'a str },

    DeleteLockedById { id: &'a str },

    DeleteByReceipt { receipt: &'a str },

    UnlockById { id: &'a str },

    UnlockByReceipt { receipt: &'a str },

    /// End the session
    Quit,
}

impl Command<'_> {
    /// The leading keyword of the request line
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Context { .. } => CMD_CTX,
            Command::Create { .. } => CMD_CRT,
            Command::SetConfig { .. } => CMD_SETCFG,
            Command::Push { .. } => CMD_PUSH,
            Command::PushBatch { .. } => CMD_PUSH_BATCH,
            Command::Pop { .. } => CMD_POP,
            Command::PopLock { .. } => CMD_POP_LOCK,
            Command::DeleteById { .. } => CMD_DELETE_BY_ID,
            Command::DeleteLockedById { .. } => CMD_DELETE_LOCKED_BY_ID,
            Command::DeleteByReceipt { .. } => CMD_DELETE_BY_RECEIPT,
            Command::UnlockById { .. } => CMD_UNLOCK_BY_ID,
            Command::UnlockByReceipt { .. } => CMD_UNLOCK_BY_RECEIPT,
            Command::Quit => CMD_QUIT,
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a command into one request line, line feed included
pub fn encode_command(command: &Command<'_>) -> BytesMut {
    let mut line = BytesMut::with_capacity(64);

    match command {
        Command::Context { queue } => {
            line.extend_from_slice(CMD_CTX.as_bytes());
            string_arg(&mut line, queue.as_bytes());
        }
        Command::Create { queue, options } => {
            line.extend_from_slice(CMD_CRT.as_bytes());
            word(&mut line, queue);
            word(&mut line, QUEUE_TYPE_PQUEUE);
            encode_queue_options(&mut line, options);
        }
        Command::SetConfig { options } => {
            line.extend_from_slice(CMD_SETCFG.as_bytes());
            encode_queue_options(&mut line, options);
        }
        Command::Push { message } => {
            line.extend_from_slice(CMD_PUSH.as_bytes());
            encode_push_message(&mut line, message);
        }
        Command::PushBatch { messages } => {
            line.extend_from_slice(CMD_PUSH_BATCH.as_bytes());
            for (i, message) in messages.iter().enumerate() {
                if i > 0 {
                    word(&mut line, BATCH_NEXT);
                }
                encode_push_message(&mut line, message);
            }
        }
        Command::Pop { options } => {
            line.extend_from_slice(CMD_POP.as_bytes());
            int_param(&mut line, PRM_LIMIT, options.limit());
            int_param(&mut line, PRM_WAIT, options.wait());
            string_param(&mut line, PRM_ASYNC, options.async_id());
        }
        Command::PopLock { options } => {
            line.extend_from_slice(CMD_POP_LOCK.as_bytes());
            int_param(&mut line, PRM_LIMIT, options.limit());
            int_param(&mut line, PRM_WAIT, options.wait());
            int_param(&mut line, PRM_LOCK_TIMEOUT, options.lock_timeout());
            string_param(&mut line, PRM_ASYNC, options.async_id());
        }
        Command::DeleteById { id }
        | Command::DeleteLockedById { id }
        | Command::UnlockById { id } => {
            line.extend_from_slice(command.keyword().as_bytes());
            string_arg(&mut line, id.as_bytes());
        }
        Command::DeleteByReceipt { receipt } | Command::UnlockByReceipt { receipt } => {
            line.extend_from_slice(command.keyword().as_bytes());
            string_arg(&mut line, receipt.as_bytes());
        }
        Command::Quit => {
            line.extend_from_slice(CMD_QUIT.as_bytes());
        }
    }

    line.put_u8(b'\n');
    line
}

/// Encode and write a command, then flush
pub fn write_command<W: Write>(writer: &mut W, command: &Command<'_>) -> Result<()> {
    let line = encode_command(command);
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Append the fields of one push item
fn encode_push_message(line: &mut BytesMut, message: &PushMessage) {
    string_param(line, PRM_ID, message.id());
    int_param(line, PRM_PRIORITY, message.priority());
    int_param(line, PRM_DELAY, message.delay());
    int_param(line, PRM_TTL, message.ttl());
    if message.sync_wait() {
        word(line, PRM_SYNC_WAIT);
    }
    word(line, PRM_PAYLOAD);
    string_arg(line, message.payload());
}

fn encode_queue_options(line: &mut BytesMut, options: &QueueOptions) {
    int_param(line, PRM_MSG_TTL, options.msg_ttl());
    int_param(line, PRM_MAX_SIZE, options.max_size());
    int_param(line, PRM_DELAY, options.delay());
    int_param(line, PRM_POP_LIMIT, options.pop_limit());
    int_param(line, PRM_LOCK_TIMEOUT, options.lock_timeout());
}

// -----------------------------------------------------------------------------
// Argument helpers
// -----------------------------------------------------------------------------

fn word(line: &mut BytesMut, word: &str) {
    line.put_u8(b' ');
    line.extend_from_slice(word.as_bytes());
}

fn string_arg(line: &mut BytesMut, value: &[u8]) {
    line.put_u8(b' ');
    encode_string(line, value);
}

fn int_param(line: &mut BytesMut, keyword: &str, value: Option<i64>) {
    if let Some(v) = value {
        word(line, keyword);
        line.put_u8(b' ');
        encode_int(line, v);
    }
}

fn string_param(line: &mut BytesMut, keyword: &str, value: Option<&str>) {
    if let Some(v) = value {
        word(line, keyword);
        string_arg(line, v.as_bytes());
    }
}
