//! # FireMPQ Client
//!
//! Blocking client for the FireMPQ priority message queue service:
//! - Binary-safe, line-oriented wire protocol
//! - Incremental tokenizer over arbitrarily fragmented reads
//! - Push, batched push, pop, pop-with-lock, delete and unlock verbs
//! - Per-item results for batched pushes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Caller                                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Queue Session                              │
//! │              (UNBOUND / BOUND to a queue)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Command   │          │  Response   │
//!   │   Encoder   │          │  Decoders   │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          │                 ┌──────┴──────┐
//!          │                 │Token Reader │
//!          │                 └──────▲──────┘
//!          ▼                        │
//!   ┌─────────────────────────────────────┐
//!   │          Transport (TCP)            │
//!   └─────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use firempq::{ClientConfig, FireMpqClient, PopLockOptions, PushMessage};
//!
//! # fn main() -> firempq::Result<()> {
//! let client = FireMpqClient::connect(ClientConfig::default())?;
//! let mut queue = client.open_queue("jobs")?;
//!
//! queue.push(&PushMessage::builder("payload").priority(3).build()?)?;
//!
//! let opts = PopLockOptions::builder().limit(10).lock_timeout(30_000).build()?;
//! for msg in queue.pop_lock(&opts)? {
//!     if let Some(receipt) = msg.receipt() {
//!         queue.delete_by_receipt(receipt)?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod queue;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FmpqError, Result, ServerError};
pub use config::ClientConfig;
pub use client::FireMpqClient;
pub use protocol::{BatchItem, QueueMessage};
pub use queue::{PopLockOptions, PopOptions, PushMessage, QueueOptions, QueueSession};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
