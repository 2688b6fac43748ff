//! Protocol Module
//!
//! Line-oriented, binary-safe wire protocol spoken with the queue service.
//!
//! ## Line Format
//! ```text
//! request:  COMMAND [ARG]*\n
//! reply:    TOKEN [TOKEN]*\n
//! ```
//!
//! Tokens are runs of printable ASCII separated by spaces. A `$N` token
//! announces that the next N bytes are one raw token, so payloads may carry
//! spaces, line feeds and NUL bytes without escaping.
//!
//! ### Replies
//! - `+OK`                       - command accepted
//! - `+MSG <id>`                 - one message stored
//! - `+MSGS *N %K ...`           - list of N messages with K fields each
//! - `+BATCH N`                  - N per-item lines follow
//! - `-ERR <code> <description>` - application error

mod wire;
mod reader;
mod command;
mod response;

pub use wire::{
    encode_int, encode_string, decode_int, decode_binary_len,
    decode_array_size, decode_map_size, MAX_BINARY_TOKEN_LEN,
};
pub use reader::{TokenReader, DEFAULT_RECV_BUFFER_SIZE};
pub use command::{Command, encode_command, write_command};
pub use response::{
    QueueMessage, BatchItem,
    decode_ok, decode_push, decode_messages, decode_batch,
    decode_server_error, decode_hello, reject,
};
