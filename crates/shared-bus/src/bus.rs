//! # Publish Boundary
//!
//! Defines the publishing side of the message bus.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus was shut down.
    #[error("Message bus closed")]
    Closed,

    /// The transport rejected or failed to deliver the record.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The message could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),
}

/// A keyed record on a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusRecord {
    /// Destination topic.
    pub topic: String,
    /// Routing/correlation key. Records sharing a key stay ordered.
    pub key: String,
    /// Encoded message.
    pub payload: Vec<u8>,
}

impl BusRecord {
    /// Create a record.
    pub fn new(topic: impl Into<String>, key: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            key: key.into(),
            payload,
        }
    }
}

/// Trait for publishing records to the bus.
///
/// Implementations own delivery semantics. Callers see exactly one outcome
/// per call and never retry on their own.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish one record.
    ///
    /// # Errors
    ///
    /// `BusError::Closed` if the bus is shut down, `BusError::Transport` if
    /// the transport failed.
    async fn publish(&self, record: BusRecord) -> Result<(), BusError>;
}

#[async_trait]
impl<B: MessageBus + ?Sized> MessageBus for Arc<B> {
    async fn publish(&self, record: BusRecord) -> Result<(), BusError> {
        (**self).publish(record).await
    }
}
