//! # Error Types
//!
//! Errors raised by the external collaborators the relay talks to.

use thiserror::Error;

/// Errors from the subscription service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// No filter with this id is registered.
    #[error("Filter not found: {0}")]
    FilterNotFound(String),

    /// The filter could not be registered.
    #[error("Filter registration failed: {0}")]
    Registration(String),

    /// The service could not be reached.
    #[error("Subscription service unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the filter store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The store could not be reached or timed out.
    #[error("Filter store unavailable: {0}")]
    Unavailable(String),
}
