//! Bus-backed filter lifecycle broadcaster.
//!
//! Only locally originated changes are announced. Nodes that receive the
//! announcement apply it as not locally originated, so it is never announced
//! a second time.

use async_trait::async_trait;
use shared_bus::{encode_record, BusSettings, MessageBus};
use shared_types::{ContractEventFilter, Message};
use tracing::info;

use crate::error::BroadcastError;
use crate::ports::FilterEventBroadcaster;

/// Publishes `FILTER_ADDED` / `FILTER_REMOVED` to the filter events topic.
pub struct BusFilterEventBroadcaster<B> {
    bus: B,
    topic: String,
}

impl<B: MessageBus> BusFilterEventBroadcaster<B> {
    pub fn new(bus: B, settings: &BusSettings) -> Self {
        Self {
            bus,
            topic: settings.filter_events_topic.clone(),
        }
    }

    async fn send(&self, message: Message<ContractEventFilter>) -> Result<(), BroadcastError> {
        let record = encode_record(&self.topic, message.id(), &message)?;

        info!(
            topic = %self.topic,
            message_id = %message.id(),
            message_type = %message.message_type(),
            filter_id = %message.details().id,
            "Sending filter event"
        );

        self.bus.publish(record).await?;
        Ok(())
    }
}

#[async_trait]
impl<B: MessageBus> FilterEventBroadcaster for BusFilterEventBroadcaster<B> {
    async fn broadcast_filter_added(
        &self,
        filter: ContractEventFilter,
    ) -> Result<(), BroadcastError> {
        self.send(Message::filter_added(filter)).await
    }

    async fn broadcast_filter_removed(
        &self,
        filter: ContractEventFilter,
    ) -> Result<(), BroadcastError> {
        self.send(Message::filter_removed(filter)).await
    }
}
