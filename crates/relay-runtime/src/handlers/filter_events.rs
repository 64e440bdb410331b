//! # Filter Events Handler
//!
//! Drains the filter events topic into the `FilterEventConsumer`.
//!
//! Each record is first decoded with an opaque payload so the type tag can be
//! checked. Tags without a handler are dropped through the consumer's error
//! path whatever their payload looks like; only the rest are decoded as a
//! `ContractEventFilter` and dispatched. Undecodable records and failed
//! dispatches are logged and counted; the loop keeps going. The loop ends
//! when the bus closes.

use std::sync::Arc;

use filter_consumer::{DispatchOutcome, FilterEventConsumer, SubscriptionService};
use relay_telemetry::{metric_inc, FILTER_MESSAGES_CONSUMED};
use serde_json::Value;
use shared_bus::{decode_message, BusRecord, TopicSubscription};
use shared_types::{ContractEventFilter, Message};
use tracing::{debug, error, info, warn};

/// Outcome label for records that cannot be read as a filter message.
const UNDECODABLE: &str = "undecodable";
/// Outcome label for dispatches that returned an error.
const FAILED: &str = "failed";

/// Handler for the filter events topic.
pub struct FilterEventsHandler<S> {
    node_name: String,
    subscription: TopicSubscription,
    consumer: Arc<FilterEventConsumer<S>>,
}

impl<S: SubscriptionService> FilterEventsHandler<S> {
    pub fn new(
        node_name: impl Into<String>,
        subscription: TopicSubscription,
        consumer: Arc<FilterEventConsumer<S>>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            subscription,
            consumer,
        }
    }

    /// Run until the bus closes.
    pub async fn run(mut self) {
        info!(
            node = %self.node_name,
            topic = %self.subscription.topic(),
            "Filter events handler started"
        );

        while let Some(record) = self.subscription.recv().await {
            self.handle_record(record).await;
        }

        info!(node = %self.node_name, "Filter events topic closed, handler stopped");
    }

    /// Decode and dispatch one record.
    ///
    /// Returns the dispatch outcome, or `None` if the record could not be
    /// decoded or the dispatch failed.
    pub async fn handle_record(&self, record: BusRecord) -> Option<DispatchOutcome> {
        let envelope: Message<Value> = match decode_message(&record.payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.undecodable(&record, "unknown", &e.to_string());
                return None;
            }
        };

        // Raw tags stay out of metric labels unless they are known.
        let type_label = envelope.kind().map_or("unknown", |kind| kind.as_str());

        if self
            .consumer
            .handler_for(envelope.message_type(), envelope.id())
            .is_none()
        {
            let outcome = DispatchOutcome::Dropped;
            metric_inc!(FILTER_MESSAGES_CONSUMED, &[type_label, outcome.as_str()]);
            return Some(outcome);
        }

        let message_id = envelope.id().to_string();
        let message_type = envelope.message_type().to_string();
        let filter: ContractEventFilter = match serde_json::from_value(envelope.into_details()) {
            Ok(filter) => filter,
            Err(e) => {
                self.undecodable(&record, type_label, &e.to_string());
                return None;
            }
        };
        let message = Message::from_parts(message_id.clone(), message_type, filter);

        debug!(
            node = %self.node_name,
            message_id = %message_id,
            message_type = %message.message_type(),
            "Received filter event"
        );

        match self.consumer.on_message(message).await {
            Ok(outcome) => {
                metric_inc!(FILTER_MESSAGES_CONSUMED, &[type_label, outcome.as_str()]);
                Some(outcome)
            }
            Err(e) => {
                error!(
                    node = %self.node_name,
                    message_id = %message_id,
                    error = %e,
                    "Failed to apply filter event"
                );
                metric_inc!(FILTER_MESSAGES_CONSUMED, &[type_label, FAILED]);
                None
            }
        }
    }

    fn undecodable(&self, record: &BusRecord, type_label: &str, error: &str) {
        warn!(
            node = %self.node_name,
            topic = %record.topic,
            key = %record.key,
            error = %error,
            "Dropping undecodable filter event"
        );
        metric_inc!(FILTER_MESSAGES_CONSUMED, &[type_label, UNDECODABLE]);
    }
}
