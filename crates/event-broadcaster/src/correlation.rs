//! Correlation key resolution for contract event messages.

use shared_types::{ContractEventDetails, CorrelationKeyStrategy, Message, RepositoryError};
use tracing::{debug, warn};

use crate::ports::FilterRepository;

/// Resolves the bus key of a contract event message from its filter.
///
/// Holds no state besides the repository handle; the filter is read on every
/// call so strategy changes take effect immediately.
pub struct CorrelationKeyResolver<R> {
    repository: R,
}

impl<R: FilterRepository> CorrelationKeyResolver<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Resolve the key for `message`.
    ///
    /// Falls back to the message id when the filter is absent, has no
    /// strategy, or its strategy cannot key this event.
    ///
    /// # Errors
    ///
    /// Propagates a failing filter store.
    pub fn resolve(&self, message: &Message<ContractEventDetails>) -> Result<String, RepositoryError> {
        let details = message.details();

        let Some(filter) = self.repository.find_by_id(&details.filter_id)? else {
            debug!(
                filter_id = %details.filter_id,
                message_id = %message.id(),
                "Filter not found, keying by message id"
            );
            return Ok(message.id().to_string());
        };

        let Some(strategy) = filter.correlation_id_strategy.as_ref() else {
            return Ok(message.id().to_string());
        };

        match strategy.derive_key(details) {
            Some(key) => Ok(key),
            None => {
                warn!(
                    filter_id = %details.filter_id,
                    strategy = strategy.name(),
                    message_id = %message.id(),
                    "Correlation strategy produced no key, keying by message id"
                );
                Ok(message.id().to_string())
            }
        }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }
}
