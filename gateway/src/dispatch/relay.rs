//! Opaque response pass-through.

use std::sync::Arc;

use tracing::warn;

use crate::bus::MessagePublisher;
use crate::config::RelayConfig;

/// Forwards upstream response payloads verbatim to their topics.
///
/// The gateway neither builds nor inspects these payloads; the upstream
/// caller (the bill/payer command handlers) owns their shape. Failures are
/// logged and swallowed, matching every other outbound flow.
pub struct ResponseRelay {
    publisher: Arc<dyn MessagePublisher>,
    config: RelayConfig,
}

impl ResponseRelay {
    pub fn new(publisher: Arc<dyn MessagePublisher>, config: RelayConfig) -> Self {
        Self { publisher, config }
    }

    /// Forwards a bill-status response.
    pub async fn forward_bill_status(&self, payload: &serde_json::Value) {
        self.forward(&self.config.bill_status_topic, payload).await;
    }

    /// Forwards a payer response.
    pub async fn forward_payer_response(&self, payload: &serde_json::Value) {
        self.forward(&self.config.payer_topic, payload).await;
    }

    async fn forward(&self, topic: &str, payload: &serde_json::Value) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(err) => {
                warn!(topic, error = %err, "response payload not serializable");
                return;
            }
        };
        if let Err(err) = self.publisher.publish(topic, &json).await {
            warn!(topic, error = %err, "response forward failed");
        }
    }
}
