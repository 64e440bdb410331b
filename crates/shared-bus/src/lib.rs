//! # Shared Bus - Message Bus Boundary
//!
//! Everything the relay needs from a publish/subscribe transport, and nothing more.
//!
//! ```text
//! ┌──────────────────┐  publish(topic, key, payload)  ┌──────────────┐
//! │ EventBroadcaster │ ─────────────────────────────→ │  MessageBus  │
//! └──────────────────┘                                │              │
//!                                                     │              │
//! ┌──────────────────┐        subscribe(topic)        │              │
//! │ Filter listener  │ ←───────────────────────────── │              │
//! └──────────────────┘                                └──────────────┘
//! ```
//!
//! - `MessageBus` is the publish boundary. Delivery guarantees, partitioning
//!   and retries belong to the implementation, never to the relay core.
//! - `codec` turns a `Message<T>` into bytes and back (JSON).
//! - `InMemoryMessageBus` is a topic-keyed implementation for single-process
//!   deployments and tests.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod codec;
pub mod memory;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main types
pub use bus::{BusError, BusRecord, MessageBus};
pub use codec::{decode_message, encode_record};
pub use memory::{InMemoryMessageBus, TopicSubscription};
pub use settings::BusSettings;

/// Maximum records to buffer per topic subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
