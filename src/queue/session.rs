//! Queue Session
//!
//! Client-side state machine for one connection and one selected queue.
//!
//! ## States
//! ```text
//!   UNBOUND ──CTX/CRT ok──▶ BOUND ──CTX fails──▶ UNBOUND
//!      │                      │
//!      └─ verbs: NotBound     └─ verbs: PUSH, POP, POPLCK, DEL, ...
//! ```
//!
//! Every verb writes one request line and blocks until its reply is fully
//! read. After a transport or format error the reader may sit mid-line, so
//! the session must be dropped (see [`FmpqError::poisons_session`]).

use crate::error::{FmpqError, Result};
use crate::network::{Connection, Transport};
use crate::protocol::{
    decode_batch, decode_messages, decode_ok, decode_push, BatchItem, Command, QueueMessage,
};
use super::{PopLockOptions, PopOptions, PushMessage, QueueOptions};

/// A session bound (or about to be bound) to one queue
pub struct QueueSession<T: Transport> {
    conn: Connection<T>,

    /// Selected queue, `None` while unbound
    queue: Option<String>,
}

impl<T: Transport> QueueSession<T> {
    /// Wrap a greeted connection; no queue is selected yet
    pub fn new(conn: Connection<T>) -> Self {
        Self { conn, queue: None }
    }

    pub fn is_bound(&self) -> bool {
        self.queue.is_some()
    }

    /// Name of the selected queue
    pub fn queue_name(&self) -> Option<&str> {
        self.queue.as_deref()
    }

    pub fn server_version(&self) -> &str {
        self.conn.version()
    }

    // =========================================================================
    // Context
    // =========================================================================

    /// Select an existing queue (`CTX`)
    ///
    /// On failure the session is left unbound.
    pub fn set_context(&mut self, queue: &str) -> Result<()> {
        validate_queue_name(queue)?;
        self.queue = None;

        let reply = self.conn.request(&Command::Context { queue })?;
        decode_ok(&reply)?;

        tracing::debug!("Selected queue {}", queue);
        self.queue = Some(queue.to_string());
        Ok(())
    }

    /// Create a priority queue (`CRT`) and select it
    pub fn create_queue(&mut self, queue: &str, options: &QueueOptions) -> Result<()> {
        validate_queue_name(queue)?;
        self.queue = None;

        let reply = self.conn.request(&Command::Create { queue, options })?;
        decode_ok(&reply)?;

        tracing::debug!("Created queue {}", queue);
        self.set_context(queue)
    }

    /// Change settings of the selected queue (`SETCFG`)
    pub fn set_config(&mut self, options: &QueueOptions) -> Result<()> {
        self.require_bound()?;
        let reply = self.conn.request(&Command::SetConfig { options })?;
        decode_ok(&reply)
    }

    // =========================================================================
    // Push
    // =========================================================================

    /// Push one message
    ///
    /// Returns the message id when the server reports one.
    pub fn push(&mut self, message: &PushMessage) -> Result<Option<String>> {
        self.require_bound()?;
        let reply = self.conn.request(&Command::Push { message })?;
        decode_push(&reply)
    }

    /// Push several messages in one round trip
    ///
    /// Items succeed or fail independently; results keep submission order.
    pub fn push_batch(&mut self, messages: &[PushMessage]) -> Result<Vec<BatchItem>> {
        self.require_bound()?;
        if messages.is_empty() {
            return Err(FmpqError::InvalidOption("batch must not be empty".to_string()));
        }

        let header = self.conn.request(&Command::PushBatch { messages })?;
        let items = decode_batch(&header, self.conn.reader_mut())?;

        if items.len() != messages.len() {
            tracing::warn!(
                "Batch of {} messages answered with {} results",
                messages.len(),
                items.len()
            );
            return Err(FmpqError::Protocol(format!(
                "batch of {} messages answered with {} results",
                messages.len(),
                items.len()
            )));
        }
        Ok(items)
    }

    // =========================================================================
    // Pop
    // =========================================================================

    /// Pop messages, removing them from the queue (`POP`)
    pub fn pop(&mut self, options: &PopOptions) -> Result<Vec<QueueMessage>> {
        self.require_bound()?;
        let reply = self.conn.request(&Command::Pop { options })?;
        decode_messages(&reply)
    }

    /// Pop messages and lock them (`POPLCK`)
    ///
    /// Locked messages carry a receipt for [`delete_by_receipt`] and
    /// [`unlock_by_receipt`].
    ///
    /// [`delete_by_receipt`]: QueueSession::delete_by_receipt
    /// [`unlock_by_receipt`]: QueueSession::unlock_by_receipt
    pub fn pop_lock(&mut self, options: &PopLockOptions) -> Result<Vec<QueueMessage>> {
        self.require_bound()?;
        let reply = self.conn.request(&Command::PopLock { options })?;
        decode_messages(&reply)
    }

    // =========================================================================
    // Delete / Unlock
    // =========================================================================

    pub fn delete_by_id(&mut self, id: &str) -> Result<()> {
        self.simple("id", id, |id| Command::DeleteById { id })
    }

    /// Delete a message only if it is currently locked
    pub fn delete_locked_by_id(&mut self, id: &str) -> Result<()> {
        self.simple("id", id, |id| Command::DeleteLockedById { id })
    }

    pub fn delete_by_receipt(&mut self, receipt: &str) -> Result<()> {
        self.simple("receipt", receipt, |receipt| Command::DeleteByReceipt { receipt })
    }

    pub fn unlock_by_id(&mut self, id: &str) -> Result<()> {
        self.simple("id", id, |id| Command::UnlockById { id })
    }

    pub fn unlock_by_receipt(&mut self, receipt: &str) -> Result<()> {
        self.simple("receipt", receipt, |receipt| Command::UnlockByReceipt { receipt })
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Say `QUIT` and close the transport
    pub fn close(mut self) -> Result<()> {
        if let Err(e) = self.conn.send(&Command::Quit) {
            tracing::debug!("QUIT not delivered: {}", e);
        }
        self.conn.close()
    }

    pub fn into_connection(self) -> Connection<T> {
        self.conn
    }

    /// Send a one-argument command that answers `+OK`
    fn simple<'a>(
        &mut self,
        what: &str,
        arg: &'a str,
        command: impl FnOnce(&'a str) -> Command<'a>,
    ) -> Result<()> {
        self.require_bound()?;
        if arg.is_empty() {
            return Err(FmpqError::InvalidOption(format!("{} must not be empty", what)));
        }
        let reply = self.conn.request(&command(arg))?;
        decode_ok(&reply)
    }

    fn require_bound(&self) -> Result<()> {
        if self.queue.is_none() {
            return Err(FmpqError::NotBound);
        }
        Ok(())
    }
}

/// Queue names travel as bare words in `CRT`, so they must be printable ASCII
fn validate_queue_name(queue: &str) -> Result<()> {
    if queue.is_empty() {
        return Err(FmpqError::InvalidOption("queue name must not be empty".to_string()));
    }
    if !queue.bytes().all(|b| (0x21..=0x7E).contains(&b)) {
        return Err(FmpqError::InvalidOption(format!(
            "queue name {:?} must be printable ASCII without spaces",
            queue
        )));
    }
    Ok(())
}
