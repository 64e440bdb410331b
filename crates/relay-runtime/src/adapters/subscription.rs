//! # Subscription Service Adapter
//!
//! Owns filter registrations on this node. Locally originated changes are
//! announced to the cluster; changes learned from the bus are applied
//! silently so they never echo.

use std::sync::Arc;

use async_trait::async_trait;
use event_broadcaster::FilterEventBroadcaster;
use filter_consumer::SubscriptionService;
use shared_types::{ContractEventFilter, SubscriptionError};
use tracing::{info, warn};

use super::filter_store::InMemoryFilterStore;

/// Subscription service backed by the in-memory filter store.
pub struct InMemorySubscriptionService {
    store: Arc<InMemoryFilterStore>,
    announcer: Arc<dyn FilterEventBroadcaster>,
}

impl InMemorySubscriptionService {
    pub fn new(store: Arc<InMemoryFilterStore>, announcer: Arc<dyn FilterEventBroadcaster>) -> Self {
        Self { store, announcer }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<InMemoryFilterStore> {
        &self.store
    }
}

#[async_trait]
impl SubscriptionService for InMemorySubscriptionService {
    /// Store the filter, then announce it if it started here.
    ///
    /// A failed announcement leaves the local registration in place and is
    /// reported as `SubscriptionError::Unavailable`.
    async fn register_contract_event_filter(
        &self,
        filter: ContractEventFilter,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError> {
        let filter_id = filter.id.clone();
        let replaced = self.store.upsert(filter.clone()).is_some();

        info!(
            filter_id = %filter_id,
            locally_originated,
            replaced,
            "Registered contract event filter"
        );

        if locally_originated {
            self.announcer
                .broadcast_filter_added(filter)
                .await
                .map_err(|e| {
                    warn!(filter_id = %filter_id, error = %e, "Filter added announcement failed");
                    SubscriptionError::Unavailable(e.to_string())
                })?;
        }
        Ok(())
    }

    async fn unregister_contract_event_filter(
        &self,
        filter_id: &str,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError> {
        let filter = self
            .store
            .remove(filter_id)
            .ok_or_else(|| SubscriptionError::FilterNotFound(filter_id.to_string()))?;

        info!(filter_id = %filter_id, locally_originated, "Unregistered contract event filter");

        if locally_originated {
            self.announcer
                .broadcast_filter_removed(filter)
                .await
                .map_err(|e| {
                    warn!(filter_id = %filter_id, error = %e, "Filter removed announcement failed");
                    SubscriptionError::Unavailable(e.to_string())
                })?;
        }
        Ok(())
    }
}
