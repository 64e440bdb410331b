//! Inbound (Driving) ports for the broadcaster.
//!
//! These are the operations the node calls when something happens on chain
//! or when a filter changes locally.

use async_trait::async_trait;
use shared_types::{BlockDetails, ContractEventDetails, ContractEventFilter};

use crate::error::BroadcastError;

/// Broadcasts blockchain events to the bus.
#[async_trait]
pub trait BlockchainEventBroadcaster: Send + Sync {
    /// Publish a `BLOCK` message keyed by its own id.
    ///
    /// # Errors
    ///
    /// `BroadcastError::Transport` if the publish fails.
    async fn broadcast_new_block(&self, block: BlockDetails) -> Result<(), BroadcastError>;

    /// Publish a `CONTRACT_EVENT` message keyed by the resolved correlation key.
    ///
    /// # Errors
    ///
    /// `BroadcastError::FilterLookup` if the filter store fails,
    /// `BroadcastError::Transport` if the publish fails.
    async fn broadcast_contract_event(
        &self,
        event: ContractEventDetails,
    ) -> Result<(), BroadcastError>;
}

/// Broadcasts filter lifecycle changes to the bus.
#[async_trait]
pub trait FilterEventBroadcaster: Send + Sync {
    /// Announce that a filter was registered on this node.
    async fn broadcast_filter_added(&self, filter: ContractEventFilter)
        -> Result<(), BroadcastError>;

    /// Announce that a filter was removed on this node.
    async fn broadcast_filter_removed(
        &self,
        filter: ContractEventFilter,
    ) -> Result<(), BroadcastError>;
}
