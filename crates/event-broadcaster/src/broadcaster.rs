//! Bus-backed blockchain event broadcaster.

use async_trait::async_trait;
use serde::Serialize;
use shared_bus::{encode_record, BusSettings, MessageBus};
use shared_types::{BlockDetails, ContractEventDetails, Message, MessageType};
use tracing::{debug, info};

use crate::correlation::CorrelationKeyResolver;
use crate::error::BroadcastError;
use crate::ports::{BlockchainEventBroadcaster, FilterRepository};

/// Publishes block and contract event messages to the configured topics.
///
/// Holds no mutable state; concurrent broadcasts are independent.
pub struct BusEventBroadcaster<B, R> {
    bus: B,
    resolver: CorrelationKeyResolver<R>,
    settings: BusSettings,
}

impl<B: MessageBus, R: FilterRepository> BusEventBroadcaster<B, R> {
    pub fn new(bus: B, repository: R, settings: BusSettings) -> Self {
        Self {
            bus,
            resolver: CorrelationKeyResolver::new(repository),
            settings,
        }
    }

    /// Topic settings in use.
    pub fn settings(&self) -> &BusSettings {
        &self.settings
    }

    async fn send<T: Serialize + Sync>(
        &self,
        topic: &str,
        key: &str,
        message: &Message<T>,
    ) -> Result<(), BroadcastError> {
        let record = encode_record(topic, key, message)?;

        info!(
            topic = topic,
            key = key,
            message_id = %message.id(),
            message_type = %message.message_type(),
            "Sending message"
        );
        debug!(payload = %String::from_utf8_lossy(&record.payload), "Message payload");

        self.bus.publish(record).await?;
        Ok(())
    }
}

#[async_trait]
impl<B: MessageBus, R: FilterRepository> BlockchainEventBroadcaster for BusEventBroadcaster<B, R> {
    async fn broadcast_new_block(&self, block: BlockDetails) -> Result<(), BroadcastError> {
        let message = Message::block(block);
        self.send(self.settings.topic_for(MessageType::Block), message.id(), &message)
            .await
    }

    async fn broadcast_contract_event(
        &self,
        event: ContractEventDetails,
    ) -> Result<(), BroadcastError> {
        let message = Message::contract_event(event);
        let key = self.resolver.resolve(&message)?;
        self.send(self.settings.topic_for(MessageType::ContractEvent), &key, &message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockFilterRepository;
    use shared_bus::test_utils::{FailingBus, RecordingBus};
    use shared_bus::BusError;
    use shared_types::{ContractEventFilter, CorrelationIdStrategy, MessageType, RepositoryError};
    use std::sync::Arc;
    use tracing_test::traced_test;

    fn broadcaster(
        repo: MockFilterRepository,
    ) -> (Arc<RecordingBus>, BusEventBroadcaster<Arc<RecordingBus>, MockFilterRepository>) {
        let bus = Arc::new(RecordingBus::new());
        let broadcaster = BusEventBroadcaster::new(bus.clone(), repo, BusSettings::default());
        (bus, broadcaster)
    }

    fn event(filter_id: &str) -> ContractEventDetails {
        ContractEventDetails {
            filter_id: filter_id.into(),
            transaction_hash: "0xBB".into(),
            block_hash: "0xAA".into(),
            log_index: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_new_block_published_once_keyed_by_id() {
        let (bus, broadcaster) = broadcaster(MockFilterRepository::new());
        let block = BlockDetails {
            hash: "0xAA".into(),
            number: 42,
            ..Default::default()
        };

        broadcaster.broadcast_new_block(block.clone()).await.unwrap();

        assert_eq!(bus.publish_count(), 1);
        let (record, message) = bus.message_at::<BlockDetails>(0).unwrap();
        assert_eq!(record.topic, "block-events");
        assert_eq!(record.key, message.id());
        assert!(!message.id().is_empty());
        assert_eq!(message.kind(), Some(MessageType::Block));
        assert_eq!(message.details(), &block);
        assert!(logs_contain("Sending message"));
    }

    #[tokio::test]
    async fn test_contract_event_keyed_by_strategy() {
        let repo = MockFilterRepository::new().with_filter(
            ContractEventFilter::new("F1").with_correlation_strategy(CorrelationIdStrategy::custom(
                "tx",
                |e| format!("tx-{}", e.transaction_hash),
            )),
        );
        let (bus, broadcaster) = broadcaster(repo);

        broadcaster.broadcast_contract_event(event("F1")).await.unwrap();

        let (record, message) = bus.message_at::<ContractEventDetails>(0).unwrap();
        assert_eq!(record.topic, "contract-events");
        assert_eq!(record.key, "tx-0xBB");
        assert_eq!(message.message_type(), "CONTRACT_EVENT");
    }

    #[tokio::test]
    async fn test_contract_event_with_absent_filter_keyed_by_id() {
        let (bus, broadcaster) = broadcaster(MockFilterRepository::new());

        broadcaster.broadcast_contract_event(event("F2")).await.unwrap();

        let (record, message) = bus.message_at::<ContractEventDetails>(0).unwrap();
        assert_eq!(record.key, message.id());
        assert_eq!(message.details().filter_id, "F2");
    }

    #[tokio::test]
    async fn test_contract_event_with_plain_filter_keyed_by_id() {
        let repo = MockFilterRepository::new().with_filter(ContractEventFilter::new("F3"));
        let (bus, broadcaster) = broadcaster(repo);

        broadcaster.broadcast_contract_event(event("F3")).await.unwrap();

        let (record, message) = bus.message_at::<ContractEventDetails>(0).unwrap();
        assert_eq!(record.key, message.id());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let broadcaster = BusEventBroadcaster::new(
            FailingBus::new("broker down"),
            MockFilterRepository::new(),
            BusSettings::default(),
        );

        let result = broadcaster.broadcast_new_block(BlockDetails::default()).await;
        assert_eq!(
            result,
            Err(BroadcastError::Transport(BusError::Transport("broker down".into())))
        );
    }

    #[tokio::test]
    async fn test_store_failure_publishes_nothing() {
        let (bus, broadcaster) = broadcaster(MockFilterRepository::unavailable());

        let result = broadcaster.broadcast_contract_event(event("F1")).await;

        assert!(matches!(
            result,
            Err(BroadcastError::FilterLookup(RepositoryError::Unavailable(_)))
        ));
        assert_eq!(bus.publish_count(), 0);
    }

    #[tokio::test]
    async fn test_custom_topics_are_used() {
        let bus = Arc::new(RecordingBus::new());
        let settings = BusSettings {
            block_events_topic: "mainnet.blocks".into(),
            contract_events_topic: "mainnet.events".into(),
            ..BusSettings::default()
        };
        let broadcaster = BusEventBroadcaster::new(bus.clone(), MockFilterRepository::new(), settings);

        broadcaster.broadcast_new_block(BlockDetails::default()).await.unwrap();
        broadcaster.broadcast_contract_event(event("F1")).await.unwrap();

        assert_eq!(bus.records()[0].topic, "mainnet.blocks");
        assert_eq!(bus.records()[1].topic, "mainnet.events");
        assert_eq!(broadcaster.settings().block_events_topic, "mainnet.blocks");
    }
}
