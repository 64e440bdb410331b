//! # In-Memory Message Bus
//!
//! Topic-keyed bus backed by `tokio::sync::broadcast`, one channel per topic.
//! Suitable for single-process operation and tests; distributed deployments
//! plug a real transport in behind `MessageBus`.
//!
//! Every subscription to a topic sees every record published after it
//! subscribed. Records published to a topic with no subscribers are dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::bus::{BusError, BusRecord, MessageBus};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// In-memory implementation of the message bus.
pub struct InMemoryMessageBus {
    /// One broadcast channel per topic, created lazily.
    topics: RwLock<HashMap<String, broadcast::Sender<BusRecord>>>,

    /// Total records accepted for publication.
    records_published: AtomicU64,

    /// Set once the bus is shut down.
    closed: AtomicBool,

    /// Per-topic channel capacity.
    capacity: usize,
}

impl InMemoryMessageBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-topic capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            records_published: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            capacity,
        }
    }

    fn sender_for(&self, topic: &str) -> broadcast::Sender<BusRecord> {
        if let Some(sender) = self.topics.read().get(topic) {
            return sender.clone();
        }
        self.topics
            .write()
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Subscribe to a topic.
    ///
    /// Returns `BusError::Closed` once the bus has been shut down.
    pub fn subscribe(&self, topic: &str) -> Result<TopicSubscription, BusError> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }
        let receiver = self.sender_for(topic).subscribe();
        debug!(topic = topic, "New topic subscription created");
        Ok(TopicSubscription {
            topic: topic.to_string(),
            receiver,
        })
    }

    /// Number of live subscriptions on a topic.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .get(topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Total records accepted for publication.
    #[must_use]
    pub fn records_published(&self) -> u64 {
        self.records_published.load(Ordering::Relaxed)
    }

    /// Channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the bus has been shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Shut the bus down. Pending subscriptions drain and then end; further
    /// publishes fail with `BusError::Closed`.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.topics.write().clear();
        debug!("In-memory message bus shut down");
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, record: BusRecord) -> Result<(), BusError> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }

        let sender = self.sender_for(&record.topic);
        let topic = record.topic.clone();
        let key = record.key.clone();
        self.records_published.fetch_add(1, Ordering::Relaxed);

        match sender.send(record) {
            Ok(receivers) => {
                debug!(topic = %topic, key = %key, receivers = receivers, "Record published");
            }
            Err(_) => {
                debug!(topic = %topic, key = %key, "Record dropped (no subscribers)");
            }
        }
        Ok(())
    }
}

/// A subscription to one topic.
pub struct TopicSubscription {
    topic: String,
    receiver: broadcast::Receiver<BusRecord>,
}

impl TopicSubscription {
    /// Receive the next record.
    ///
    /// Returns `None` once the bus is shut down and the buffer is drained.
    pub async fn recv(&mut self) -> Option<BusRecord> {
        loop {
            match self.receiver.recv().await {
                Ok(record) => return Some(record),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(topic = %self.topic, lagged = count, "Subscriber lagged, some records dropped");
                }
            }
        }
    }

    /// Receive without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` - A record was available
    /// - `Ok(None)` - Nothing buffered
    /// - `Err(BusError::Closed)` - The bus was shut down
    pub fn try_recv(&mut self) -> Result<Option<BusRecord>, BusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(record) => return Ok(Some(record)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(BusError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    /// The subscribed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}
