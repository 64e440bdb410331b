//! Error types for the filter consumer.

use shared_types::SubscriptionError;
use thiserror::Error;

/// Errors that escape dispatch. The hosting runtime decides on redelivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsumerError {
    /// The subscription service failed in a way the handler does not absorb.
    #[error("Subscription service error: {0}")]
    Subscription(#[from] SubscriptionError),
}
