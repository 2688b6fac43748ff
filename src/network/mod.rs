//! Network Module
//!
//! Transport abstraction and connection bootstrap.
//!
//! ## Lifecycle
//! - Caller supplies a connected transport (TCP by default)
//! - Server greets with `+HELLO <version>`
//! - Requests and replies then alternate strictly, no pipelining

mod transport;
mod connection;

pub use transport::Transport;
pub use connection::Connection;
