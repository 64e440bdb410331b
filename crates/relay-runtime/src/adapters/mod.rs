//! # Adapters
//!
//! Concrete implementations of the relay's outbound ports.
//!
//! - `filter_store`: `FilterRepository` over an in-memory map
//! - `subscription`: `SubscriptionService` that announces local changes
//! - `metered_bus`: `MessageBus` decorator feeding Prometheus counters

pub mod filter_store;
pub mod metered_bus;
pub mod subscription;

pub use filter_store::InMemoryFilterStore;
pub use metered_bus::MeteredBus;
pub use subscription::InMemorySubscriptionService;
