//! # Message Bus
//!
//! Publish-only sink abstraction over the message bus. The gateway never
//! consumes from the bus and never waits on downstream confirmation.
//! `publish` resolves when the transport accepts (or rejects) the message,
//! and everything past that is the consumers' problem.
//!
//! Delivery is at-least-once by design: the dispatchers persist state
//! *after* publishing, so a crash in between replays the message on the
//! next tick. Consumers must be idempotent on their own keys.

mod kafka;
mod memory;

pub use kafka::KafkaPublisher;
pub use memory::MemoryPublisher;

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// PublishError
// ---------------------------------------------------------------------------

/// Errors surfaced by a publisher implementation.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The transport refused or timed out on the message.
    #[error("message bus transport error: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// MessagePublisher
// ---------------------------------------------------------------------------

/// Best-effort publish of a UTF-8 JSON payload to a named topic.
///
/// Implementations must not retry internally; retry policy belongs to the
/// callers, whose next poll tick re-selects any work whose publish failed.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
}
