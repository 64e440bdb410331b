//! Ports for the broadcaster.

pub mod inbound;
pub mod outbound;

pub use inbound::{BlockchainEventBroadcaster, FilterEventBroadcaster};
pub use outbound::FilterRepository;
