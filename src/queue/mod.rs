//! Queue Module
//!
//! Priority queue verbs on top of a greeted connection.
//!
//! ## Responsibilities
//! - Validate push descriptors and option sets before they are sent
//! - Track which queue a session is bound to
//! - Map each verb to one request and decode its reply

mod options;
mod session;

pub use options::{
    PushMessage, PushMessageBuilder,
    PopOptions, PopOptionsBuilder,
    PopLockOptions, PopLockOptionsBuilder,
    QueueOptions, QueueOptionsBuilder,
};
pub use session::QueueSession;
