//! Error types for the broadcaster.

use shared_bus::BusError;
use shared_types::RepositoryError;
use thiserror::Error;

/// Errors that can occur while broadcasting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// The bus failed to accept the message. Not retried here.
    #[error("Transport error: {0}")]
    Transport(#[from] BusError),

    /// The filter store failed (as opposed to not having the filter).
    #[error("Filter lookup failed: {0}")]
    FilterLookup(#[from] RepositoryError),
}
