//! Recording publisher.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{MessagePublisher, PublishError};

/// Publisher that records every message instead of sending it.
///
/// Backs the test suites and the node's `--dry-run` mode. A failure switch
/// lets tests exercise the retry-on-next-tick paths without a broker.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    messages: Mutex<Vec<(String, String)>>,
    failing: Mutex<bool>,
    failing_topics: Mutex<Vec<String>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent publish fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Makes publishes to one topic fail while others keep working.
    pub fn fail_topic(&self, topic: &str) {
        self.failing_topics.lock().push(topic.to_string());
    }

    /// Snapshot of every `(topic, payload)` recorded so far.
    pub fn published(&self) -> Vec<(String, String)> {
        self.messages.lock().clone()
    }

    /// Payloads recorded on one topic, in publish order.
    pub fn on_topic(&self, topic: &str) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl MessagePublisher for MemoryPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if *self.failing.lock() || self.failing_topics.lock().iter().any(|t| t == topic) {
            return Err(PublishError::Transport("publisher switched off".into()));
        }
        tracing::debug!(topic, payload, "recording message");
        self.messages
            .lock()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}
