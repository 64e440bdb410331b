//! # Metered Bus
//!
//! Wraps any `MessageBus` and records publish outcomes in the relay
//! Prometheus counters.

use async_trait::async_trait;
use relay_telemetry::{metric_inc, MESSAGES_PUBLISHED, PUBLISH_FAILURES};
use serde::Deserialize;
use shared_bus::{BusError, BusRecord, MessageBus};
use tracing::warn;

/// Only the envelope type tag, read back from an encoded payload.
#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    message_type: String,
}

fn message_type_of(payload: &[u8]) -> String {
    serde_json::from_slice::<TypeTag>(payload)
        .map(|tag| tag.message_type)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// A `MessageBus` that counts what passes through it.
pub struct MeteredBus<B> {
    inner: B,
}

impl<B: MessageBus> MeteredBus<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: MessageBus> MessageBus for MeteredBus<B> {
    async fn publish(&self, record: BusRecord) -> Result<(), BusError> {
        let topic = record.topic.clone();
        let message_type = message_type_of(&record.payload);

        match self.inner.publish(record).await {
            Ok(()) => {
                metric_inc!(MESSAGES_PUBLISHED, &[topic.as_str(), message_type.as_str()]);
                Ok(())
            }
            Err(e) => {
                metric_inc!(PUBLISH_FAILURES, &[topic.as_str()]);
                warn!(topic = %topic, message_type = %message_type, error = %e, "Publish failed");
                Err(e)
            }
        }
    }
}
