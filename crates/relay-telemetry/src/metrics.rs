//! Prometheus metrics for the event relay.
//!
//! All metrics follow the naming convention: `relay_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Messages accepted by the bus, by topic and message type
    pub static ref MESSAGES_PUBLISHED: CounterVec = CounterVec::new(
        Opts::new("relay_messages_published_total", "Messages published to the bus"),
        &["topic", "message_type"]
    ).expect("metric creation failed");

    /// Publishes rejected by the bus, by topic
    pub static ref PUBLISH_FAILURES: CounterVec = CounterVec::new(
        Opts::new("relay_publish_failures_total", "Publishes that failed at the transport"),
        &["topic"]
    ).expect("metric creation failed");

    /// Filter messages consumed, by message type and dispatch outcome
    pub static ref FILTER_MESSAGES_CONSUMED: CounterVec = CounterVec::new(
        Opts::new("relay_filter_messages_consumed_total", "Filter lifecycle messages consumed"),
        &["message_type", "outcome"]  // outcome: applied/already_applied/dropped/failed/undecodable
    ).expect("metric creation failed");
}

/// Handle to registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering again is a no-op.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(MESSAGES_PUBLISHED.clone()),
        Box::new(PUBLISH_FAILURES.clone()),
        Box::new(FILTER_MESSAGES_CONSUMED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_twice() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_counter_increment_is_encoded() {
        register_metrics().unwrap();
        crate::metric_inc!(MESSAGES_PUBLISHED, &["block-events", "BLOCK"]);

        let text = encode_metrics().unwrap();
        assert!(text.contains("relay_messages_published_total"));
        assert!(text.contains("topic=\"block-events\""));
    }

    #[test]
    fn test_consumed_counter_labels() {
        FILTER_MESSAGES_CONSUMED
            .with_label_values(&["FILTER_REMOVED", "already_applied"])
            .inc();
        assert!(
            FILTER_MESSAGES_CONSUMED
                .with_label_values(&["FILTER_REMOVED", "already_applied"])
                .get()
                >= 1.0
        );
    }
}
