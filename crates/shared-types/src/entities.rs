//! # Domain Entities
//!
//! Payloads carried inside `Message<T>`.
//!
//! ## Clusters
//!
//! - **Chain**: `BlockDetails`
//! - **Contract Events**: `ContractEventDetails`, `EventParameter`, `ContractEventStatus`
//! - **Filters**: `ContractEventFilter`, `ContractEventSpecification`, `ParameterDefinition`
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationIdStrategy;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A block observed on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockDetails {
    /// Block height.
    pub number: u64,
    /// Block hash (0x-prefixed hex).
    pub hash: String,
    /// Unix timestamp of the block.
    pub timestamp: u64,
    /// Name of the node the block was observed on.
    #[serde(default)]
    pub node_name: String,
}

// =============================================================================
// CLUSTER B: CONTRACT EVENTS
// =============================================================================

/// Confirmation status of a contract event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractEventStatus {
    /// Seen in a block that has not reached the confirmation depth.
    #[default]
    Unconfirmed,
    /// Reached the confirmation depth.
    Confirmed,
    /// The containing block was reorganised away.
    Invalidated,
}

/// A single decoded event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventParameter {
    /// Solidity type, e.g. `uint256`, `address`.
    #[serde(rename = "type")]
    pub param_type: String,
    /// Decoded value rendered as a string.
    pub value: String,
}

impl EventParameter {
    /// Create a parameter.
    pub fn new(param_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            value: value.into(),
        }
    }
}

/// A contract event emitted on chain and matched by a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContractEventDetails {
    /// Event name from the filter's specification.
    #[serde(default)]
    pub name: String,
    /// Id of the filter that produced this event (foreign key, not owned).
    pub filter_id: String,
    /// Node the event was observed on.
    #[serde(default)]
    pub node_name: String,
    /// Decoded indexed (topic) parameters, in declaration order.
    #[serde(default)]
    pub indexed_parameters: Vec<EventParameter>,
    /// Decoded non-indexed (data) parameters, in declaration order.
    #[serde(default)]
    pub non_indexed_parameters: Vec<EventParameter>,
    /// Hash of the emitting transaction.
    pub transaction_hash: String,
    /// Position of the log within the block.
    pub log_index: u64,
    /// Height of the containing block.
    #[serde(default)]
    pub block_number: u64,
    /// Hash of the containing block.
    pub block_hash: String,
    /// Address of the emitting contract.
    #[serde(default)]
    pub address: String,
    /// Confirmation status.
    #[serde(default)]
    pub status: ContractEventStatus,
    /// Keccak signature of the event specification.
    #[serde(default)]
    pub event_specification_signature: String,
    /// Network the node is connected to.
    #[serde(default)]
    pub network_name: String,
}

impl ContractEventDetails {
    /// Natural identity of the event: `{transactionHash}-{blockHash}-{logIndex}`.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.transaction_hash, self.block_hash, self.log_index
        )
    }
}

// =============================================================================
// CLUSTER C: FILTERS
// =============================================================================

/// Position and type of one parameter in an event specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParameterDefinition {
    /// Zero-based position in the event signature.
    pub position: usize,
    /// Solidity type.
    #[serde(rename = "type")]
    pub param_type: String,
}

/// Describes the event a filter matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContractEventSpecification {
    /// Solidity event name.
    pub event_name: String,
    /// Indexed parameters.
    #[serde(default)]
    pub indexed_parameter_definitions: Vec<ParameterDefinition>,
    /// Non-indexed parameters.
    #[serde(default)]
    pub non_indexed_parameter_definitions: Vec<ParameterDefinition>,
}

/// A contract event filter.
///
/// Owned by the subscription service. The broadcaster only reads it to find
/// the correlation strategy; the consumer only forwards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContractEventFilter {
    /// Filter id.
    pub id: String,
    /// Address of the watched contract.
    #[serde(default)]
    pub contract_address: String,
    /// Node the filter is registered against.
    #[serde(default)]
    pub node: String,
    /// The matched event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_specification: Option<ContractEventSpecification>,
    /// How events produced by this filter are keyed on the bus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id_strategy: Option<CorrelationIdStrategy>,
}

impl ContractEventFilter {
    /// A bare filter with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attach a correlation strategy.
    #[must_use]
    pub fn with_correlation_strategy(mut self, strategy: CorrelationIdStrategy) -> Self {
        self.correlation_id_strategy = Some(strategy);
        self
    }

    /// Attach an event specification.
    #[must_use]
    pub fn with_event_specification(mut self, specification: ContractEventSpecification) -> Self {
        self.event_specification = Some(specification);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_event_id() {
        let event = ContractEventDetails {
            transaction_hash: "0xBB".into(),
            block_hash: "0xAA".into(),
            log_index: 3,
            ..Default::default()
        };
        assert_eq!(event.id(), "0xBB-0xAA-3");
    }

    #[test]
    fn test_event_details_wire_names() {
        let event = ContractEventDetails {
            filter_id: "F1".into(),
            transaction_hash: "0xBB".into(),
            status: ContractEventStatus::Confirmed,
            indexed_parameters: vec![EventParameter::new("address", "0x01")],
            ..Default::default()
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["filterId"], "F1");
        assert_eq!(json["transactionHash"], "0xBB");
        assert_eq!(json["status"], "CONFIRMED");
        assert_eq!(json["indexedParameters"][0]["type"], "address");
    }

    #[test]
    fn test_filter_decodes_with_only_id() {
        let filter: ContractEventFilter = serde_json::from_str(r#"{"id":"F1"}"#).unwrap();

        assert_eq!(filter, ContractEventFilter::new("F1"));
        assert!(filter.correlation_id_strategy.is_none());
    }

    #[test]
    fn test_filter_with_strategy_decodes() {
        let raw = r#"{
            "id": "F2",
            "contractAddress": "0xC0",
            "eventSpecification": {
                "eventName": "Transfer",
                "indexedParameterDefinitions": [{"position": 0, "type": "ADDRESS"}]
            },
            "correlationIdStrategy": {"type": "INDEXED_PARAMETER", "parameterIndex": 0}
        }"#;
        let filter: ContractEventFilter = serde_json::from_str(raw).unwrap();

        assert_eq!(filter.contract_address, "0xC0");
        assert_eq!(
            filter.event_specification.map(|s| s.event_name),
            Some("Transfer".to_string())
        );
        assert_eq!(
            filter.correlation_id_strategy,
            Some(CorrelationIdStrategy::IndexedParameter { parameter_index: 0 })
        );
    }
}
