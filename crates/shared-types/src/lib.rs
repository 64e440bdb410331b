//! # Shared Types Crate
//!
//! This crate contains the `Message<T>` envelope, the domain payloads that
//! travel inside it and the correlation strategies that decide how contract
//! events are keyed on the bus.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every type that crosses the bus is defined here.
//! - **Envelope Identity**: A message's `id` is assigned once at creation and is
//!   the default correlation key.
//! - **Foreign Filters**: `ContractEventDetails::filter_id` is a lookup key into
//!   an externally owned filter store, never an owned relationship.

pub mod correlation;
pub mod entities;
pub mod envelope;
pub mod errors;

pub use correlation::{CorrelationIdStrategy, CorrelationKeyStrategy, CustomCorrelationStrategy};
pub use entities::*;
pub use envelope::{Message, MessageType};
pub use errors::*;
