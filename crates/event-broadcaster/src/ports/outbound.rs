//! Outbound (Driven) ports for the broadcaster.

use std::sync::Arc;

use shared_types::{ContractEventFilter, RepositoryError};

/// Read-only view of the filter store.
///
/// Lookups are synchronous and may block; the caller's runtime is expected
/// to tolerate that.
pub trait FilterRepository: Send + Sync {
    /// Find a filter by id.
    ///
    /// # Returns
    /// - `Ok(Some(filter))`: the filter exists
    /// - `Ok(None)`: no such filter
    /// - `Err`: the store failed
    fn find_by_id(&self, id: &str) -> Result<Option<ContractEventFilter>, RepositoryError>;
}

impl<R: FilterRepository + ?Sized> FilterRepository for Arc<R> {
    fn find_by_id(&self, id: &str) -> Result<Option<ContractEventFilter>, RepositoryError> {
        (**self).find_by_id(id)
    }
}

/// Mock filter repository for testing.
#[cfg(test)]
pub struct MockFilterRepository {
    filters: std::collections::HashMap<String, ContractEventFilter>,
    unavailable: bool,
    lookups: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockFilterRepository {
    pub fn new() -> Self {
        Self {
            filters: std::collections::HashMap::new(),
            unavailable: false,
            lookups: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_filter(mut self, filter: ContractEventFilter) -> Self {
        self.filters.insert(filter.id.clone(), filter);
        self
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl FilterRepository for MockFilterRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<ContractEventFilter>, RepositoryError> {
        self.lookups
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.unavailable {
            return Err(RepositoryError::Unavailable("store offline".into()));
        }
        Ok(self.filters.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository() {
        let repo = MockFilterRepository::new().with_filter(ContractEventFilter::new("F1"));

        assert_eq!(repo.find_by_id("F1").unwrap().map(|f| f.id), Some("F1".into()));
        assert_eq!(repo.find_by_id("F2").unwrap(), None);
        assert_eq!(repo.lookups(), 2);
    }

    #[test]
    fn test_arc_repository_delegates() {
        let repo = Arc::new(MockFilterRepository::new().with_filter(ContractEventFilter::new("F1")));
        let shared: Arc<dyn FilterRepository> = repo.clone();

        assert!(shared.find_by_id("F1").unwrap().is_some());
        assert_eq!(repo.lookups(), 1);
    }

    #[test]
    fn test_unavailable_repository() {
        let repo = MockFilterRepository::unavailable();
        assert!(repo.find_by_id("F1").is_err());
    }
}
