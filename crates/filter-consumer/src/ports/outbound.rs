//! Outbound (Driven) ports for the filter consumer.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ContractEventFilter, SubscriptionError};

/// The service that owns filter registrations.
///
/// `locally_originated` tells the service whether the change started on this
/// node. Only locally originated changes are announced on the bus.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Register (or replace) a filter.
    async fn register_contract_event_filter(
        &self,
        filter: ContractEventFilter,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError>;

    /// Remove a filter.
    ///
    /// # Errors
    ///
    /// `SubscriptionError::FilterNotFound` if no filter has this id.
    async fn unregister_contract_event_filter(
        &self,
        filter_id: &str,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError>;
}

#[async_trait]
impl<S: SubscriptionService + ?Sized> SubscriptionService for Arc<S> {
    async fn register_contract_event_filter(
        &self,
        filter: ContractEventFilter,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError> {
        (**self)
            .register_contract_event_filter(filter, locally_originated)
            .await
    }

    async fn unregister_contract_event_filter(
        &self,
        filter_id: &str,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError> {
        (**self)
            .unregister_contract_event_filter(filter_id, locally_originated)
            .await
    }
}

/// One recorded call on the mock service.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionCall {
    Register { filter_id: String, locally_originated: bool },
    Unregister { filter_id: String, locally_originated: bool },
}

/// Mock subscription service for testing.
///
/// Keeps a set of registered ids and records every call.
#[cfg(test)]
#[derive(Default)]
pub struct MockSubscriptionService {
    registered: std::sync::Mutex<std::collections::HashSet<String>>,
    calls: std::sync::Mutex<Vec<SubscriptionCall>>,
    fail_with: Option<SubscriptionError>,
}

#[cfg(test)]
impl MockSubscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `error` after being recorded.
    pub fn failing(error: SubscriptionError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn with_registered(self, filter_id: &str) -> Self {
        self.registered.lock().unwrap().insert(filter_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<SubscriptionCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_registered(&self, filter_id: &str) -> bool {
        self.registered.lock().unwrap().contains(filter_id)
    }
}

#[cfg(test)]
#[async_trait]
impl SubscriptionService for MockSubscriptionService {
    async fn register_contract_event_filter(
        &self,
        filter: ContractEventFilter,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError> {
        self.calls.lock().unwrap().push(SubscriptionCall::Register {
            filter_id: filter.id.clone(),
            locally_originated,
        });
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.registered.lock().unwrap().insert(filter.id);
        Ok(())
    }

    async fn unregister_contract_event_filter(
        &self,
        filter_id: &str,
        locally_originated: bool,
    ) -> Result<(), SubscriptionError> {
        self.calls.lock().unwrap().push(SubscriptionCall::Unregister {
            filter_id: filter_id.to_string(),
            locally_originated,
        });
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        if self.registered.lock().unwrap().remove(filter_id) {
            Ok(())
        } else {
            Err(SubscriptionError::FilterNotFound(filter_id.to_string()))
        }
    }
}
