//! Type tag → handler dispatch table.

use std::collections::HashMap;

use shared_types::{ContractEventFilter, Message, MessageType, SubscriptionError};
use tracing::debug;

use crate::error::ConsumerError;
use crate::ports::SubscriptionService;

/// What happened to a consumed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler changed subscription state.
    Applied,
    /// The desired state already held (filter already removed).
    AlreadyApplied,
    /// No handler for the type tag; the message was dropped.
    Dropped,
}

impl DispatchOutcome {
    /// Label for logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::AlreadyApplied => "already_applied",
            Self::Dropped => "dropped",
        }
    }
}

/// The closed set of filter message handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterHandler {
    /// Register the carried filter as not locally originated.
    RegisterFilter,
    /// Unregister the carried filter's id as not locally originated.
    /// `FilterNotFound` is absorbed.
    UnregisterFilter,
}

impl FilterHandler {
    /// Run the handler against the subscription service.
    ///
    /// # Errors
    ///
    /// Any subscription failure except `FilterNotFound` on removal.
    pub async fn handle<S: SubscriptionService + ?Sized>(
        self,
        service: &S,
        message: Message<ContractEventFilter>,
    ) -> Result<DispatchOutcome, ConsumerError> {
        match self {
            Self::RegisterFilter => {
                service
                    .register_contract_event_filter(message.into_details(), false)
                    .await?;
                Ok(DispatchOutcome::Applied)
            }
            Self::UnregisterFilter => {
                match service
                    .unregister_contract_event_filter(&message.details().id, false)
                    .await
                {
                    Ok(()) => Ok(DispatchOutcome::Applied),
                    Err(SubscriptionError::FilterNotFound(filter_id)) => {
                        debug!(
                            filter_id = %filter_id,
                            message_id = %message.id(),
                            "Received filter removed message but filter doesn't exist"
                        );
                        Ok(DispatchOutcome::AlreadyApplied)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

/// Immutable mapping from wire type tag to handler.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    handlers: HashMap<&'static str, FilterHandler>,
}

impl DispatchTable {
    /// A table with exactly the given entries. Later entries for the same
    /// type replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = (MessageType, FilterHandler)>) -> Self {
        Self {
            handlers: entries
                .into_iter()
                .map(|(message_type, handler)| (message_type.as_str(), handler))
                .collect(),
        }
    }

    /// The handler for a raw type tag.
    #[must_use]
    pub fn lookup(&self, message_type: &str) -> Option<FilterHandler> {
        self.handlers.get(message_type).copied()
    }

    /// Registered type tags, sorted.
    #[must_use]
    pub fn message_types(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.handlers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::from_entries([
            (MessageType::FilterAdded, FilterHandler::RegisterFilter),
            (MessageType::FilterRemoved, FilterHandler::UnregisterFilter),
        ])
    }
}
