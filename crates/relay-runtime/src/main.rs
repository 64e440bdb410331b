//! # Event Relay Runtime
//!
//! Runs one relay node: publishes block and contract events to the bus and
//! keeps the node's filter registrations in step with the rest of the
//! cluster through the filter events topic.
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration from the environment
//! 2. Initialize telemetry (logs and metrics)
//! 3. Create the bus and wire the node
//! 4. Start the filter events handler
//! 5. Run until Ctrl+C, then shut down gracefully

use std::sync::Arc;

use anyhow::{Context, Result};
use relay_runtime::{RelayConfig, RelayNode};
use relay_telemetry::{encode_metrics, init_telemetry};
use shared_bus::InMemoryMessageBus;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = RelayConfig::from_env();
    config.validate().context("Invalid relay configuration")?;

    // Initialize logging and metrics
    let _telemetry = init_telemetry(&config.telemetry)?;

    let bus = Arc::new(InMemoryMessageBus::with_capacity(config.bus.channel_capacity));
    let node = RelayNode::new(config, Arc::clone(&bus))?;
    node.start().context("Failed to start filter events handler")?;

    info!(node = %node.node_name(), "Relay is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    node.shutdown().await;
    bus.shutdown();

    match encode_metrics() {
        Ok(metrics) => debug!("Final metrics:\n{}", metrics),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }

    Ok(())
}
