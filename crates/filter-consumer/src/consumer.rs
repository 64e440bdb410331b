//! The filter event consumer.

use shared_types::{ContractEventFilter, Message};
use tracing::{debug, error};

use crate::dispatch::{DispatchOutcome, DispatchTable, FilterHandler};
use crate::error::ConsumerError;
use crate::ports::SubscriptionService;

/// Consumes filter lifecycle messages and applies them locally.
///
/// Invoked by the bus client for each delivered message; concurrent calls
/// are independent.
pub struct FilterEventConsumer<S> {
    service: S,
    table: DispatchTable,
}

impl<S: SubscriptionService> FilterEventConsumer<S> {
    /// A consumer with the default `FILTER_ADDED` / `FILTER_REMOVED` table.
    pub fn new(service: S) -> Self {
        Self::with_dispatch_table(service, DispatchTable::default())
    }

    /// A consumer with a custom table.
    pub fn with_dispatch_table(service: S, table: DispatchTable) -> Self {
        Self { service, table }
    }

    /// Dispatch one message.
    ///
    /// Unknown type tags are logged and dropped (`DispatchOutcome::Dropped`).
    ///
    /// # Errors
    ///
    /// Handler failures that are not absorbed, e.g. a failed registration.
    pub async fn on_message(
        &self,
        message: Message<ContractEventFilter>,
    ) -> Result<DispatchOutcome, ConsumerError> {
        let Some(handler) = self.handler_for(message.message_type(), message.id()) else {
            return Ok(DispatchOutcome::Dropped);
        };

        debug!(
            message_type = %message.message_type(),
            message_id = %message.id(),
            filter_id = %message.details().id,
            handler = ?handler,
            "Dispatching filter message"
        );

        handler.handle(&self.service, message).await
    }

    /// The handler for a raw type tag.
    ///
    /// A tag with no handler is logged at error, naming the type, and the
    /// caller should drop the message. Listeners call this before decoding
    /// the payload as a filter.
    pub fn handler_for(&self, message_type: &str, message_id: &str) -> Option<FilterHandler> {
        let handler = self.table.lookup(message_type);
        if handler.is_none() {
            error!(
                message_type = %message_type,
                message_id = %message_id,
                "No consumer for message type {}!",
                message_type
            );
        }
        handler
    }

    /// The dispatch table in use.
    pub fn dispatch_table(&self) -> &DispatchTable {
        &self.table
    }

    /// The subscription service.
    pub fn service(&self) -> &S {
        &self.service
    }
}
