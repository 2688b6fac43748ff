//! Wire primitives
//!
//! Scalar encoding for request lines and scalar decoding for reply tokens.
//!
//! ## Token Syntax
//! ```text
//! integer   42, -7          (reply side may carry a ':' sigil: :42)
//! string    $<len> <bytes>  ($5 hello)
//! array     *<count>        (count values follow)
//! map       %<pairs>        (2 * pairs tokens follow)
//! ```

use bytes::{BufMut, BytesMut};

use crate::error::{FmpqError, Result};

/// Largest binary token the reader accepts (128 MiB)
pub const MAX_BINARY_TOKEN_LEN: usize = 128 * 1024 * 1024;

// =============================================================================
// Encoding
// =============================================================================

/// Append an integer as decimal ASCII
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    buf.extend_from_slice(value.to_string().as_bytes());
}

/// Append a length-prefixed string: `$<len> <bytes>`
pub fn encode_string(buf: &mut BytesMut, value: &[u8]) {
    buf.reserve(value.len() + 12);
    buf.put_u8(b'$');
    buf.extend_from_slice(value.len().to_string().as_bytes());
    buf.put_u8(b' ');
    buf.extend_from_slice(value);
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an integer token, with or without a leading `:`
pub fn decode_int(token: &[u8]) -> Result<i64> {
    let digits = token.strip_prefix(b":").unwrap_or(token);
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| FmpqError::InvalidInteger(String::from_utf8_lossy(token).into_owned()))
}

/// Decode the `N` of a `$N` binary header (the `$` already stripped)
pub fn decode_binary_len(digits: &[u8]) -> Result<usize> {
    let len = std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            FmpqError::InvalidBinaryLength(format!("${}", String::from_utf8_lossy(digits)))
        })?;

    if len < 1 || len > MAX_BINARY_TOKEN_LEN {
        return Err(FmpqError::InvalidBinaryLength(format!(
            "{} bytes (allowed 1..={})",
            len, MAX_BINARY_TOKEN_LEN
        )));
    }
    Ok(len)
}

/// Decode an array header `*N` into its element count
pub fn decode_array_size(token: &[u8]) -> Result<usize> {
    decode_size_header(token, b'*', "array")
}

/// Decode a map header `%N` into its pair count
pub fn decode_map_size(token: &[u8]) -> Result<usize> {
    decode_size_header(token, b'%', "map")
}

fn decode_size_header(token: &[u8], sigil: u8, what: &str) -> Result<usize> {
    let bad = || {
        FmpqError::Protocol(format!(
            "bad {} size header: {}",
            what,
            String::from_utf8_lossy(token)
        ))
    };

    match token.split_first() {
        Some((first, rest)) if *first == sigil => std::str::from_utf8(rest)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(bad),
        _ => Err(bad()),
    }
}
