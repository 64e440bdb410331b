//! # Relay Wiring
//!
//! Connects the relay components to one message bus.
//!
//! ```text
//!                     ┌──────────────────────────────┐
//!  block / event ───→ │ BusEventBroadcaster          │ ──┐
//!                     │   └─ InMemoryFilterStore ◄───┼─┐ │
//!                     └──────────────────────────────┘ │ │
//!                     ┌──────────────────────────────┐ │ │   ┌───────────┐
//!  local filter ────→ │ InMemorySubscriptionService  │─┘ ├─→ │ MeteredBus│
//!   changes           │   └─ BusFilterEventBroadcaster ────┘ └─────┬─────┘
//!                     └──────────────▲───────────────┘             │
//!                                    │ locally_originated = false  │
//!                     ┌──────────────┴───────────────┐             │
//!                     │ FilterEventsHandler          │ ◄── filter events topic
//!                     │   └─ FilterEventConsumer     │
//!                     └──────────────────────────────┘
//! ```

use std::sync::Arc;

use event_broadcaster::{BusEventBroadcaster, BusFilterEventBroadcaster};
use filter_consumer::FilterEventConsumer;
use parking_lot::Mutex;
use shared_bus::{BusError, InMemoryMessageBus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapters::{InMemoryFilterStore, InMemorySubscriptionService, MeteredBus};
use crate::container::{ConfigError, RelayConfig};
use crate::handlers::FilterEventsHandler;

/// The bus every relay component publishes through.
pub type RelayBus = MeteredBus<Arc<InMemoryMessageBus>>;

/// The relay's blockchain event broadcaster.
pub type RelayBroadcaster = BusEventBroadcaster<Arc<RelayBus>, Arc<InMemoryFilterStore>>;

/// The relay's filter event consumer.
pub type RelayConsumer = FilterEventConsumer<Arc<InMemorySubscriptionService>>;

/// One relay node attached to a shared bus.
pub struct RelayNode {
    config: RelayConfig,
    bus: Arc<InMemoryMessageBus>,
    store: Arc<InMemoryFilterStore>,
    subscriptions: Arc<InMemorySubscriptionService>,
    broadcaster: RelayBroadcaster,
    consumer: Arc<RelayConsumer>,
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl RelayNode {
    /// Build a node on `bus`. Nothing runs until `start`.
    pub fn new(config: RelayConfig, bus: Arc<InMemoryMessageBus>) -> Result<Self, ConfigError> {
        config.validate()?;

        let metered = Arc::new(MeteredBus::new(Arc::clone(&bus)));
        let store = Arc::new(InMemoryFilterStore::new());

        let announcer = Arc::new(BusFilterEventBroadcaster::new(Arc::clone(&metered), &config.bus));
        let subscriptions = Arc::new(InMemorySubscriptionService::new(Arc::clone(&store), announcer));

        let broadcaster =
            BusEventBroadcaster::new(Arc::clone(&metered), Arc::clone(&store), config.bus.clone());
        let consumer = Arc::new(FilterEventConsumer::new(Arc::clone(&subscriptions)));

        let (shutdown_tx, _) = watch::channel(false);

        info!(
            node = %config.node.node_name,
            group_id = %config.bus.group_id,
            "Relay node created"
        );

        Ok(Self {
            config,
            bus,
            store,
            subscriptions,
            broadcaster,
            consumer,
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
        })
    }

    /// Subscribe to the filter events topic and spawn its handler.
    ///
    /// The subscription exists when this returns, so every filter event
    /// published afterwards reaches this node.
    pub fn start(&self) -> Result<(), BusError> {
        let topic = &self.config.bus.filter_events_topic;
        let subscription = self.bus.subscribe(topic)?;
        let handler = FilterEventsHandler::new(
            self.node_name(),
            subscription,
            Arc::clone(&self.consumer),
        );

        let node_name = self.node_name().to_string();
        let mut shutdown = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = handler.run() => {}
                _ = shutdown.changed() => {
                    info!(node = %node_name, "Filter events handler received shutdown signal");
                }
            }
        });
        self.handles.lock().push(handle);

        info!(
            node = %self.node_name(),
            filter_topic = %topic,
            block_topic = %self.config.bus.block_events_topic,
            contract_topic = %self.config.bus.contract_events_topic,
            "Relay node started"
        );
        Ok(())
    }

    /// Stop the handlers and wait for them to finish.
    pub async fn shutdown(&self) {
        info!(node = %self.node_name(), "Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            // No receivers: the node was never started.
            info!(node = %self.node_name(), "No running handlers to stop: {}", e);
        }

        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                error!(node = %self.node_name(), "Handler task failed: {}", e);
            }
        }

        info!(node = %self.node_name(), "Shutdown complete");
    }

    /// Broadcaster for blocks and contract events.
    pub fn broadcaster(&self) -> &RelayBroadcaster {
        &self.broadcaster
    }

    /// Subscription service for filter registration on this node.
    pub fn subscriptions(&self) -> &Arc<InMemorySubscriptionService> {
        &self.subscriptions
    }

    /// Filters currently registered on this node.
    pub fn filter_store(&self) -> &Arc<InMemoryFilterStore> {
        &self.store
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn node_name(&self) -> &str {
        &self.config.node.node_name
    }
}
