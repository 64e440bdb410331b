//! Ports for the filter consumer.

pub mod outbound;

pub use outbound::SubscriptionService;
