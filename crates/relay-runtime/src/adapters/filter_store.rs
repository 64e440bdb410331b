//! # In-Memory Filter Store
//!
//! Registered contract event filters, keyed by filter id. Read by the
//! broadcaster on every contract event and written by the subscription
//! service.

use std::collections::HashMap;

use event_broadcaster::FilterRepository;
use parking_lot::RwLock;
use shared_types::{ContractEventFilter, RepositoryError};

/// Filter store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryFilterStore {
    filters: RwLock<HashMap<String, ContractEventFilter>>,
}

impl InMemoryFilterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a filter. Returns the previous filter with the same id.
    pub fn upsert(&self, filter: ContractEventFilter) -> Option<ContractEventFilter> {
        self.filters.write().insert(filter.id.clone(), filter)
    }

    /// Remove a filter by id.
    pub fn remove(&self, filter_id: &str) -> Option<ContractEventFilter> {
        self.filters.write().remove(filter_id)
    }

    #[must_use]
    pub fn contains(&self, filter_id: &str) -> bool {
        self.filters.read().contains_key(filter_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.read().is_empty()
    }
}

impl FilterRepository for InMemoryFilterStore {
    fn find_by_id(&self, filter_id: &str) -> Result<Option<ContractEventFilter>, RepositoryError> {
        Ok(self.filters.read().get(filter_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CorrelationIdStrategy;

    #[test]
    fn test_upsert_replaces() {
        let store = InMemoryFilterStore::new();

        assert!(store.upsert(ContractEventFilter::new("F1")).is_none());
        let previous = store.upsert(
            ContractEventFilter::new("F1")
                .with_correlation_strategy(CorrelationIdStrategy::TransactionHash),
        );

        assert!(previous.is_some());
        assert_eq!(store.len(), 1);
        let stored = store.find_by_id("F1").unwrap().unwrap();
        assert_eq!(
            stored.correlation_id_strategy,
            Some(CorrelationIdStrategy::TransactionHash)
        );
    }

    #[test]
    fn test_find_missing() {
        let store = InMemoryFilterStore::new();
        assert_eq!(store.find_by_id("nope"), Ok(None));
    }

    #[test]
    fn test_remove() {
        let store = InMemoryFilterStore::new();
        store.upsert(ContractEventFilter::new("F2"));
        store.upsert(ContractEventFilter::new("F1"));
        assert_eq!(store.len(), 2);

        assert!(store.remove("F1").is_some());
        assert!(store.remove("F1").is_none());
        assert!(!store.contains("F1"));
        assert!(!store.is_empty());
    }
}
