//! Request options
//!
//! Push descriptors and per-verb option sets. Every builder validates in
//! `build()`, so a value that reaches the encoder is always sendable.
//! Unset fields stay `None` and are left out of the request line.

use bytes::Bytes;

use crate::error::{FmpqError, Result};

fn non_negative(name: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(FmpqError::InvalidOption(format!(
            "{} must not be negative, got {}",
            name, v
        ))),
        _ => Ok(()),
    }
}

fn positive(name: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v <= 0 => Err(FmpqError::InvalidOption(format!(
            "{} must be positive, got {}",
            name, v
        ))),
        _ => Ok(()),
    }
}

fn non_empty(name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some("") => Err(FmpqError::InvalidOption(format!("{} must not be empty", name))),
        _ => Ok(()),
    }
}

// =============================================================================
// Push
// =============================================================================

/// A message to be pushed into a priority queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    payload: Bytes,
    id: Option<String>,
    priority: Option<i64>,
    delay: Option<i64>,
    ttl: Option<i64>,
    sync_wait: bool,
}

impl PushMessage {
    /// Message with a payload and server defaults for everything else
    pub fn new(payload: impl Into<Bytes>) -> Result<Self> {
        Self::builder(payload).build()
    }

    pub fn builder(payload: impl Into<Bytes>) -> PushMessageBuilder {
        PushMessageBuilder {
            message: PushMessage {
                payload: payload.into(),
                id: None,
                priority: None,
                delay: None,
                ttl: None,
                sync_wait: false,
            },
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn priority(&self) -> Option<i64> {
        self.priority
    }

    /// Delivery delay in milliseconds
    pub fn delay(&self) -> Option<i64> {
        self.delay
    }

    /// Time to live in milliseconds
    pub fn ttl(&self) -> Option<i64> {
        self.ttl
    }

    /// Whether the server should reply only after the message is stored
    pub fn sync_wait(&self) -> bool {
        self.sync_wait
    }
}

/// Builder for PushMessage
#[derive(Debug, Clone)]
pub struct PushMessageBuilder {
    message: PushMessage,
}

impl PushMessageBuilder {
    /// Set a caller-chosen message id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.message.id = Some(id.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.message.priority = Some(priority);
        self
    }

    /// Set the delivery delay (in milliseconds)
    pub fn delay(mut self, ms: i64) -> Self {
        self.message.delay = Some(ms);
        self
    }

    /// Set the message time to live (in milliseconds)
    pub fn ttl(mut self, ms: i64) -> Self {
        self.message.ttl = Some(ms);
        self
    }

    pub fn sync_wait(mut self, sync_wait: bool) -> Self {
        self.message.sync_wait = sync_wait;
        self
    }

    pub fn build(self) -> Result<PushMessage> {
        let msg = self.message;
        if msg.payload.is_empty() {
            return Err(FmpqError::InvalidOption("payload must not be empty".to_string()));
        }
        non_empty("id", msg.id.as_deref())?;
        non_negative("delay", msg.delay)?;
        non_negative("ttl", msg.ttl)?;
        Ok(msg)
    }
}

// =============================================================================
// Pop
// =============================================================================

/// Options for `POP`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopOptions {
    limit: Option<i64>,
    wait: Option<i64>,
    async_id: Option<String>,
}

impl PopOptions {
    pub fn builder() -> PopOptionsBuilder {
        PopOptionsBuilder::default()
    }

    /// Max number of messages to return
    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// How long the server may wait for messages (in milliseconds)
    pub fn wait(&self) -> Option<i64> {
        self.wait
    }

    pub fn async_id(&self) -> Option<&str> {
        self.async_id.as_deref()
    }
}

/// Builder for PopOptions
#[derive(Debug, Clone, Default)]
pub struct PopOptionsBuilder {
    options: PopOptions,
}

impl PopOptionsBuilder {
    /// Set the message limit. Upper bound is defined by the server config.
    pub fn limit(mut self, limit: i64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Set the wait timeout (in milliseconds)
    pub fn wait(mut self, ms: i64) -> Self {
        self.options.wait = Some(ms);
        self
    }

    pub fn async_id(mut self, id: impl Into<String>) -> Self {
        self.options.async_id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<PopOptions> {
        let opts = self.options;
        positive("limit", opts.limit)?;
        non_negative("wait", opts.wait)?;
        non_empty("async id", opts.async_id.as_deref())?;
        Ok(opts)
    }
}

/// Options for `POPLCK`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopLockOptions {
    limit: Option<i64>,
    wait: Option<i64>,
    lock_timeout: Option<i64>,
    async_id: Option<String>,
}

impl PopLockOptions {
    pub fn builder() -> PopLockOptionsBuilder {
        PopLockOptionsBuilder::default()
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn wait(&self) -> Option<i64> {
        self.wait
    }

    /// How long popped messages stay locked (in milliseconds)
    pub fn lock_timeout(&self) -> Option<i64> {
        self.lock_timeout
    }

    pub fn async_id(&self) -> Option<&str> {
        self.async_id.as_deref()
    }
}

/// Builder for PopLockOptions
#[derive(Debug, Clone, Default)]
pub struct PopLockOptionsBuilder {
    options: PopLockOptions,
}

impl PopLockOptionsBuilder {
    pub fn limit(mut self, limit: i64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn wait(mut self, ms: i64) -> Self {
        self.options.wait = Some(ms);
        self
    }

    /// Set the lock timeout (in milliseconds)
    pub fn lock_timeout(mut self, ms: i64) -> Self {
        self.options.lock_timeout = Some(ms);
        self
    }

    pub fn async_id(mut self, id: impl Into<String>) -> Self {
        self.options.async_id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<PopLockOptions> {
        let opts = self.options;
        positive("limit", opts.limit)?;
        non_negative("wait", opts.wait)?;
        non_negative("lock timeout", opts.lock_timeout)?;
        non_empty("async id", opts.async_id.as_deref())?;
        Ok(opts)
    }
}

// =============================================================================
// Queue
// =============================================================================

/// Queue settings for `CRT` and `SETCFG`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueOptions {
    msg_ttl: Option<i64>,
    max_size: Option<i64>,
    delay: Option<i64>,
    pop_limit: Option<i64>,
    lock_timeout: Option<i64>,
}

impl QueueOptions {
    pub fn builder() -> QueueOptionsBuilder {
        QueueOptionsBuilder::default()
    }

    /// Default message time to live (in milliseconds)
    pub fn msg_ttl(&self) -> Option<i64> {
        self.msg_ttl
    }

    /// Max number of messages the queue holds
    pub fn max_size(&self) -> Option<i64> {
        self.max_size
    }

    /// Default delivery delay (in milliseconds)
    pub fn delay(&self) -> Option<i64> {
        self.delay
    }

    /// Max number of pop attempts per message
    pub fn pop_limit(&self) -> Option<i64> {
        self.pop_limit
    }

    /// Default pop lock timeout (in milliseconds)
    pub fn lock_timeout(&self) -> Option<i64> {
        self.lock_timeout
    }

    /// True when no setting is present
    pub fn is_empty(&self) -> bool {
        *self == QueueOptions::default()
    }
}

/// Builder for QueueOptions
#[derive(Debug, Clone, Default)]
pub struct QueueOptionsBuilder {
    options: QueueOptions,
}

impl QueueOptionsBuilder {
    pub fn msg_ttl(mut self, ms: i64) -> Self {
        self.options.msg_ttl = Some(ms);
        self
    }

    pub fn max_size(mut self, size: i64) -> Self {
        self.options.max_size = Some(size);
        self
    }

    pub fn delay(mut self, ms: i64) -> Self {
        self.options.delay = Some(ms);
        self
    }

    pub fn pop_limit(mut self, limit: i64) -> Self {
        self.options.pop_limit = Some(limit);
        self
    }

    pub fn lock_timeout(mut self, ms: i64) -> Self {
        self.options.lock_timeout = Some(ms);
        self
    }

    pub fn build(self) -> Result<QueueOptions> {
        let opts = self.options;
        positive("msg ttl", opts.msg_ttl)?;
        positive("max size", opts.max_size)?;
        non_negative("delay", opts.delay)?;
        non_negative("pop limit", opts.pop_limit)?;
        non_negative("lock timeout", opts.lock_timeout)?;
        Ok(opts)
    }
}
