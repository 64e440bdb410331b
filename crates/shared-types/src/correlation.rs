//! # Correlation Strategies
//!
//! A filter may carry a strategy that derives the bus routing key for the
//! contract events it produces. Events that share a key are delivered in order
//! relative to each other; events without a strategy are keyed by their own
//! message id and spread freely.
//!
//! ## Variants
//!
//! | Variant | Wire form | Key |
//! |---------|-----------|-----|
//! | `TransactionHash` | `{"type":"TRANSACTION_HASH"}` | `transactionHash` |
//! | `IndexedParameter` | `{"type":"INDEXED_PARAMETER","parameterIndex":n}` | value of indexed parameter `n` |
//! | `Custom` | not serialisable | result of a closure |

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entities::ContractEventDetails;

/// Capability to derive a routing key from a contract event.
pub trait CorrelationKeyStrategy: Send + Sync {
    /// Derive the key, or `None` when this strategy cannot key the event.
    fn derive_key(&self, details: &ContractEventDetails) -> Option<String>;
}

type KeyDeriver = dyn Fn(&ContractEventDetails) -> String + Send + Sync;

/// An in-process strategy backed by a closure.
///
/// Two custom strategies are equal when their names are equal.
#[derive(Clone)]
pub struct CustomCorrelationStrategy {
    name: String,
    derive: Arc<KeyDeriver>,
}

impl CustomCorrelationStrategy {
    /// Wrap a closure under a name.
    pub fn new<F>(name: impl Into<String>, derive: F) -> Self
    where
        F: Fn(&ContractEventDetails) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            derive: Arc::new(derive),
        }
    }

    /// Strategy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomCorrelationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCorrelationStrategy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomCorrelationStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl CorrelationKeyStrategy for CustomCorrelationStrategy {
    fn derive_key(&self, details: &ContractEventDetails) -> Option<String> {
        Some((self.derive)(details))
    }
}

/// Correlation strategy attached to a `ContractEventFilter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationIdStrategy {
    /// Key by transaction hash: all events of one transaction stay ordered.
    TransactionHash,

    /// Key by the value of one indexed parameter (e.g. a token holder).
    #[serde(rename_all = "camelCase")]
    IndexedParameter {
        /// Zero-based index into `indexedParameters`.
        parameter_index: usize,
    },

    /// Key by an arbitrary closure. Lives only in process.
    #[serde(skip)]
    Custom(CustomCorrelationStrategy),
}

impl CorrelationIdStrategy {
    /// A custom strategy from a closure.
    pub fn custom<F>(name: impl Into<String>, derive: F) -> Self
    where
        F: Fn(&ContractEventDetails) -> String + Send + Sync + 'static,
    {
        Self::Custom(CustomCorrelationStrategy::new(name, derive))
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::TransactionHash => "TRANSACTION_HASH",
            Self::IndexedParameter { .. } => "INDEXED_PARAMETER",
            Self::Custom(custom) => custom.name(),
        }
    }
}

impl CorrelationKeyStrategy for CorrelationIdStrategy {
    fn derive_key(&self, details: &ContractEventDetails) -> Option<String> {
        match self {
            Self::TransactionHash => Some(details.transaction_hash.clone()),
            Self::IndexedParameter { parameter_index } => details
                .indexed_parameters
                .get(*parameter_index)
                .map(|parameter| parameter.value.clone()),
            Self::Custom(custom) => custom.derive_key(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EventParameter;

    fn event() -> ContractEventDetails {
        ContractEventDetails {
            filter_id: "F1".into(),
            transaction_hash: "0xBB".into(),
            block_hash: "0xAA".into(),
            indexed_parameters: vec![
                EventParameter::new("address", "0xfrom"),
                EventParameter::new("address", "0xto"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_transaction_hash_strategy() {
        let key = CorrelationIdStrategy::TransactionHash.derive_key(&event());
        assert_eq!(key.as_deref(), Some("0xBB"));
    }

    #[test]
    fn test_indexed_parameter_strategy() {
        let strategy = CorrelationIdStrategy::IndexedParameter { parameter_index: 1 };
        assert_eq!(strategy.derive_key(&event()).as_deref(), Some("0xto"));
    }

    #[test]
    fn test_indexed_parameter_out_of_range_yields_none() {
        let strategy = CorrelationIdStrategy::IndexedParameter { parameter_index: 5 };
        assert_eq!(strategy.derive_key(&event()), None);
    }

    #[test]
    fn test_custom_strategy() {
        let strategy =
            CorrelationIdStrategy::custom("tx-prefix", |e| format!("tx-{}", e.transaction_hash));

        assert_eq!(strategy.derive_key(&event()).as_deref(), Some("tx-0xBB"));
        assert_eq!(strategy.name(), "tx-prefix");
    }

    #[test]
    fn test_custom_strategies_compare_by_name() {
        let a = CorrelationIdStrategy::custom("same", |_| "a".to_string());
        let b = CorrelationIdStrategy::custom("same", |_| "b".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_wire_form() {
        let json = serde_json::to_value(CorrelationIdStrategy::TransactionHash).unwrap();
        assert_eq!(json, serde_json::json!({"type": "TRANSACTION_HASH"}));

        let json =
            serde_json::to_value(CorrelationIdStrategy::IndexedParameter { parameter_index: 2 })
                .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "INDEXED_PARAMETER", "parameterIndex": 2})
        );
    }

    #[test]
    fn test_custom_is_not_serialisable() {
        let strategy = CorrelationIdStrategy::custom("local", |_| String::new());
        assert!(serde_json::to_value(strategy).is_err());
    }
}
