//! # Relay Configuration
//!
//! Unified configuration for the bus topics, telemetry and node identity.
//! Every value has a default; environment variables override them.

use std::env;

use relay_telemetry::TelemetryConfig;
use shared_bus::BusSettings;
use thiserror::Error;

/// Complete relay configuration.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Bus topics and consumer group.
    pub bus: BusSettings,
    /// Logging and metrics.
    pub telemetry: TelemetryConfig,
    /// Name of this node, attached to its log lines.
    pub node: NodeIdentity,
}

/// Identity of this relay node.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    pub node_name: String,
}

impl Default for NodeIdentity {
    fn default() -> Self {
        Self {
            node_name: "default".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A topic name is empty.
    #[error("Topic for {0} must not be empty")]
    EmptyTopic(&'static str),

    /// The consumer group is empty.
    #[error("Consumer group id must not be empty")]
    EmptyGroupId,

    /// The filter events topic is shared with an event topic, so the
    /// listener would consume block or contract event messages.
    #[error("Filter events topic '{0}' collides with an event topic")]
    TopicCollision(String),

    /// Channel capacity must be positive.
    #[error("Channel capacity must be greater than zero")]
    ZeroCapacity,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RELAY_BLOCK_EVENTS_TOPIC` (default: block-events)
    /// - `RELAY_CONTRACT_EVENTS_TOPIC` (default: contract-events)
    /// - `RELAY_FILTER_EVENTS_TOPIC` (default: filter-events)
    /// - `RELAY_GROUP_ID` (default: relay)
    /// - `RELAY_CHANNEL_CAPACITY` (default: 1000)
    /// - `RELAY_NODE_NAME` (default: default)
    /// - telemetry variables, see `TelemetryConfig::from_env`
    pub fn from_env() -> Self {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };

        if let Ok(topic) = env::var("RELAY_BLOCK_EVENTS_TOPIC") {
            config.bus.block_events_topic = topic;
        }
        if let Ok(topic) = env::var("RELAY_CONTRACT_EVENTS_TOPIC") {
            config.bus.contract_events_topic = topic;
        }
        if let Ok(topic) = env::var("RELAY_FILTER_EVENTS_TOPIC") {
            config.bus.filter_events_topic = topic;
        }
        if let Ok(group_id) = env::var("RELAY_GROUP_ID") {
            config.bus.group_id = group_id;
        }
        if let Ok(capacity) = env::var("RELAY_CHANNEL_CAPACITY") {
            if let Ok(c) = capacity.parse() {
                config.bus.channel_capacity = c;
            }
        }
        if let Ok(node_name) = env::var("RELAY_NODE_NAME") {
            config.node.node_name = node_name;
        }

        config
    }

    /// Check the configuration before wiring anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bus = &self.bus;
        for (name, topic) in [
            ("block events", &bus.block_events_topic),
            ("contract events", &bus.contract_events_topic),
            ("filter events", &bus.filter_events_topic),
        ] {
            if topic.trim().is_empty() {
                return Err(ConfigError::EmptyTopic(name));
            }
        }
        if bus.group_id.trim().is_empty() {
            return Err(ConfigError::EmptyGroupId);
        }
        if bus.filter_events_topic == bus.block_events_topic
            || bus.filter_events_topic == bus.contract_events_topic
        {
            return Err(ConfigError::TopicCollision(bus.filter_events_topic.clone()));
        }
        if bus.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(RelayConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_topic_rejected() {
        let mut config = RelayConfig::default();
        config.bus.contract_events_topic = " ".into();

        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyTopic("contract events"))
        );
    }

    #[test]
    fn test_empty_group_rejected() {
        let mut config = RelayConfig::default();
        config.bus.group_id.clear();

        assert_eq!(config.validate(), Err(ConfigError::EmptyGroupId));
    }

    #[test]
    fn test_topic_collision_rejected() {
        let mut config = RelayConfig::default();
        config.bus.filter_events_topic = config.bus.block_events_topic.clone();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::TopicCollision(_))
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = RelayConfig::default();
        config.bus.channel_capacity = 0;

        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }
}
