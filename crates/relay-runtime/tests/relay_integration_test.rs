//! Two relay nodes sharing one in-memory bus.
//!
//! Filter changes made on one node must reach the other through the filter
//! events topic without being announced twice, and contract events must be
//! keyed by the strategy of the filter as the receiving node knows it.

use std::sync::Arc;
use std::time::Duration;

use event_broadcaster::BlockchainEventBroadcaster;
use filter_consumer::SubscriptionService;
use relay_runtime::{RelayConfig, RelayNode};
use shared_bus::{encode_record, InMemoryMessageBus, MessageBus};
use shared_types::{
    ContractEventDetails, ContractEventFilter, CorrelationIdStrategy, EventParameter, Message,
};
use tokio::time::{sleep, timeout};

fn node(name: &str, bus: &Arc<InMemoryMessageBus>) -> RelayNode {
    let mut config = RelayConfig::default();
    config.node.node_name = name.to_string();
    let node = RelayNode::new(config, Arc::clone(bus)).unwrap();
    node.start().unwrap();
    node
}

/// Poll until `condition` holds, failing after one second.
async fn eventually(condition: impl Fn() -> bool) {
    timeout(Duration::from_secs(1), async {
        while !condition() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Let both handlers drain anything still in flight.
async fn settle() {
    sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_filter_added_on_one_node_reaches_the_other() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let a = node("node-a", &bus);
    let b = node("node-b", &bus);

    a.subscriptions()
        .register_contract_event_filter(ContractEventFilter::new("F1"), true)
        .await
        .unwrap();

    eventually(|| b.filter_store().contains("F1")).await;
    settle().await;

    // One announcement; neither node re-announced what it learned.
    assert_eq!(bus.records_published(), 1);

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_filter_removal_propagates_and_echo_is_absorbed() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let a = node("node-a", &bus);
    let b = node("node-b", &bus);

    a.subscriptions()
        .register_contract_event_filter(ContractEventFilter::new("F1"), true)
        .await
        .unwrap();
    eventually(|| b.filter_store().contains("F1")).await;
    settle().await;

    a.subscriptions()
        .unregister_contract_event_filter("F1", true)
        .await
        .unwrap();

    eventually(|| !b.filter_store().contains("F1")).await;
    settle().await;

    assert!(!a.filter_store().contains("F1"));
    assert_eq!(bus.records_published(), 2);

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_removal_is_harmless() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let a = node("node-a", &bus);
    let b = node("node-b", &bus);
    b.filter_store().upsert(ContractEventFilter::new("F1"));

    let removed = Message::filter_removed(ContractEventFilter::new("F1"));
    let record = encode_record("filter-events", removed.id(), &removed).unwrap();
    bus.publish(record.clone()).await.unwrap();
    bus.publish(record).await.unwrap();

    eventually(|| !b.filter_store().contains("F1")).await;
    settle().await;

    assert!(a.filter_store().is_empty());
    assert!(b.filter_store().is_empty());

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_unknown_message_type_is_ignored() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let b = node("node-b", &bus);

    let unknown = Message::from_parts("m-1", "FILTER_RENAMED", ContractEventFilter::new("F9"));
    let record = encode_record("filter-events", unknown.id(), &unknown).unwrap();
    bus.publish(record).await.unwrap();

    // A valid message behind it is still applied.
    let added = Message::filter_added(ContractEventFilter::new("F1"));
    let record = encode_record("filter-events", added.id(), &added).unwrap();
    bus.publish(record).await.unwrap();

    eventually(|| b.filter_store().contains("F1")).await;
    assert!(!b.filter_store().contains("F9"));

    b.shutdown().await;
}

#[tokio::test]
async fn test_contract_event_keyed_by_propagated_strategy() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let a = node("node-a", &bus);
    let b = node("node-b", &bus);
    let mut contract_events = bus.subscribe("contract-events").unwrap();

    a.subscriptions()
        .register_contract_event_filter(
            ContractEventFilter::new("F1").with_correlation_strategy(
                CorrelationIdStrategy::IndexedParameter { parameter_index: 1 },
            ),
            true,
        )
        .await
        .unwrap();
    eventually(|| b.filter_store().contains("F1")).await;

    let event = ContractEventDetails {
        name: "Transfer".into(),
        filter_id: "F1".into(),
        node_name: "node-b".into(),
        indexed_parameters: vec![
            EventParameter::new("address", "0xfrom"),
            EventParameter::new("address", "0xto"),
        ],
        transaction_hash: "0xtx".into(),
        block_hash: "0xblock".into(),
        log_index: 3,
        ..Default::default()
    };
    b.broadcaster().broadcast_contract_event(event).await.unwrap();

    let record = timeout(Duration::from_secs(1), contract_events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.key, "0xto");

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_contract_event_for_unknown_filter_keyed_by_message_id() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let a = node("node-a", &bus);
    let mut contract_events = bus.subscribe("contract-events").unwrap();

    let event = ContractEventDetails {
        filter_id: "gone".into(),
        transaction_hash: "0xtx".into(),
        ..Default::default()
    };
    a.broadcaster().broadcast_contract_event(event).await.unwrap();

    let record = contract_events.try_recv().unwrap().unwrap();
    let message: Message<ContractEventDetails> =
        shared_bus::decode_message(&record.payload).unwrap();
    assert_eq!(record.key, message.id());

    a.shutdown().await;
}
