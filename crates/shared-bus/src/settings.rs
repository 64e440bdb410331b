//! Topic settings shared by the broadcaster and the filter listener.

use shared_types::MessageType;

use crate::DEFAULT_CHANNEL_CAPACITY;

/// Bus topic configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusSettings {
    /// Topic for `BLOCK` messages.
    pub block_events_topic: String,
    /// Topic for `CONTRACT_EVENT` messages.
    pub contract_events_topic: String,
    /// Topic for `FILTER_ADDED` / `FILTER_REMOVED` messages.
    pub filter_events_topic: String,
    /// Consumer group for the filter events topic.
    pub group_id: String,
    /// Per-subscriber buffer for the in-memory bus.
    pub channel_capacity: usize,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            block_events_topic: "block-events".to_string(),
            contract_events_topic: "contract-events".to_string(),
            filter_events_topic: "filter-events".to_string(),
            group_id: "relay".to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BusSettings {
    /// The topic a message type is published to.
    #[must_use]
    pub fn topic_for(&self, message_type: MessageType) -> &str {
        match message_type {
            MessageType::Block => &self.block_events_topic,
            MessageType::ContractEvent => &self.contract_events_topic,
            MessageType::FilterAdded | MessageType::FilterRemoved => &self.filter_events_topic,
        }
    }
}
