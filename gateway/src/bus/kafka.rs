//! Kafka-backed publisher.

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};

use super::{MessagePublisher, PublishError};
use crate::config::KafkaConfig;

/// Publishes through an rdkafka [`FutureProducer`].
///
/// Messages are sent unkeyed. Partition affinity does not matter for any
/// of the gateway's topics, and the downstream consumers key on fields
/// inside the payload.
pub struct KafkaPublisher {
    producer: FutureProducer,
    timeout: std::time::Duration,
}

impl KafkaPublisher {
    /// Builds a producer against the configured brokers.
    pub fn new(config: &KafkaConfig) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set(
                "message.timeout.ms",
                config.message_timeout.as_millis().to_string(),
            )
            .create()
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        Ok(Self {
            producer,
            timeout: config.message_timeout,
        })
    }
}

#[async_trait]
impl MessagePublisher for KafkaPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        let record = FutureRecord::<(), str>::to(topic).payload(payload);

        self.producer
            .send(record, self.timeout)
            .await
            .map(|_| ())
            .map_err(|(err, _)| PublishError::Transport(err.to_string()))
    }
}
