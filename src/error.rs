//! Error types for the FireMPQ client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FmpqError
pub type Result<T> = std::result::Result<T, FmpqError>;

/// Application error reported by the server as `-ERR <code> <description>`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("FMPQERR {code}: {description}")]
pub struct ServerError {
    /// Numeric error code chosen by the server
    pub code: i64,

    /// Human readable description
    pub description: String,
}

impl ServerError {
    pub fn new(code: i64, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

/// Unified error type for FireMPQ client operations
#[derive(Debug, Error)]
pub enum FmpqError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Invalid binary token length: {0}")]
    InvalidBinaryLength(String),

    #[error("Wrong int format: {0}")]
    InvalidInteger(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Unexpected hello string: {0}")]
    Handshake(String),

    // -------------------------------------------------------------------------
    // Application Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Server(#[from] ServerError),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("No queue context selected")]
    NotBound,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FmpqError {
    /// True for a well-formed `-ERR` reply from the server
    pub fn is_server_error(&self) -> bool {
        matches!(self, FmpqError::Server(_))
    }

    /// The server error code, if this is an application error
    pub fn server_code(&self) -> Option<i64> {
        match self {
            FmpqError::Server(e) => Some(e.code),
            _ => None,
        }
    }

    /// Whether the connection may be left mid-line after this error.
    ///
    /// A session that returned one of these must be discarded: the token
    /// reader may hold the tail of an unconsumed reply.
    pub fn poisons_session(&self) -> bool {
        matches!(
            self,
            FmpqError::Io(_)
                | FmpqError::ConnectionClosed
                | FmpqError::InvalidBinaryLength(_)
                | FmpqError::InvalidInteger(_)
                | FmpqError::Protocol(_)
                | FmpqError::UnexpectedResponse(_)
                | FmpqError::Handshake(_)
        )
    }
}

/// Render a token line for error messages
pub(crate) fn describe_tokens(tokens: &[bytes::Bytes]) -> String {
    let parts: Vec<String> = tokens
        .iter()
        .map(|t| String::from_utf8_lossy(t).into_owned())
        .collect();
    format!("[{}]", parts.join(" "))
}
