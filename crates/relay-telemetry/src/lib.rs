//! # Relay Telemetry
//!
//! Observability for the event relay.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, JSON in
//!   containers and pretty output in development.
//! - **Metrics**: Prometheus counters for published and consumed messages.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RELAY_SERVICE_NAME` | `event-relay` | Service name in log lines |
//! | `RELAY_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `RELAY_JSON_LOGS` | `false` (`true` in containers) | JSON output |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, FILTER_MESSAGES_CONSUMED,
    MESSAGES_PUBLISHED, PUBLISH_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
