//! # `Message<T>` Envelope
//!
//! The universal wrapper for everything published to or consumed from the bus.
//!
//! ## Wire Shape
//!
//! ```text
//! { "id": "<uuid>", "type": "CONTRACT_EVENT", "details": { ... } }
//! ```
//!
//! - **Identity**: `id` is a v4 UUID assigned when the message is created.
//! - **Type Tag**: `type` is kept as a raw string so that inbound messages with
//!   tags this node does not know can still be decoded, logged and dropped.
//! - **Immutability**: fields are private; a message never changes after creation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{BlockDetails, ContractEventDetails, ContractEventFilter};

/// The closed set of message kinds this relay produces and understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// A new block was mined/imported.
    Block,
    /// A contract event matched a registered filter.
    ContractEvent,
    /// A contract event filter was registered somewhere in the cluster.
    FilterAdded,
    /// A contract event filter was removed somewhere in the cluster.
    FilterRemoved,
}

impl MessageType {
    /// Wire tag for block messages.
    pub const BLOCK: &'static str = "BLOCK";
    /// Wire tag for contract event messages.
    pub const CONTRACT_EVENT: &'static str = "CONTRACT_EVENT";
    /// Wire tag for filter added messages.
    pub const FILTER_ADDED: &'static str = "FILTER_ADDED";
    /// Wire tag for filter removed messages.
    pub const FILTER_REMOVED: &'static str = "FILTER_REMOVED";

    /// The wire tag for this message type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => Self::BLOCK,
            Self::ContractEvent => Self::CONTRACT_EVENT,
            Self::FilterAdded => Self::FILTER_ADDED,
            Self::FilterRemoved => Self::FILTER_REMOVED,
        }
    }

    /// Parse a wire tag. Returns `None` for tags this relay does not know.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            Self::BLOCK => Some(Self::Block),
            Self::CONTRACT_EVENT => Some(Self::ContractEvent),
            Self::FILTER_ADDED => Some(Self::FilterAdded),
            Self::FILTER_REMOVED => Some(Self::FilterRemoved),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The message envelope.
///
/// `T` is the payload (`details`). Use the typed constructors
/// ([`Message::block`], [`Message::contract_event`], [`Message::filter_added`],
/// [`Message::filter_removed`]) for outbound messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T> {
    /// Globally unique identifier, assigned at creation.
    id: String,

    /// Payload kind tag.
    #[serde(rename = "type")]
    message_type: String,

    /// The payload.
    details: T,
}

impl<T> Message<T> {
    /// Create a new message of the given type with a fresh unique id.
    #[must_use]
    pub fn new(message_type: MessageType, details: T) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_type: message_type.as_str().to_string(),
            details,
        }
    }

    /// Rebuild a message from its raw parts.
    ///
    /// Used for inbound messages and tests; the tag is not validated.
    #[must_use]
    pub fn from_parts(id: impl Into<String>, message_type: impl Into<String>, details: T) -> Self {
        Self {
            id: id.into(),
            message_type: message_type.into(),
            details,
        }
    }

    /// The unique message id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw type tag as carried on the wire.
    #[must_use]
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// The parsed type tag, if it is one this relay knows.
    #[must_use]
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::from_tag(&self.message_type)
    }

    /// The payload.
    #[must_use]
    pub fn details(&self) -> &T {
        &self.details
    }

    /// Consume the envelope and return the payload.
    #[must_use]
    pub fn into_details(self) -> T {
        self.details
    }
}

impl Message<BlockDetails> {
    /// A `BLOCK` message.
    #[must_use]
    pub fn block(details: BlockDetails) -> Self {
        Self::new(MessageType::Block, details)
    }
}

impl Message<ContractEventDetails> {
    /// A `CONTRACT_EVENT` message.
    #[must_use]
    pub fn contract_event(details: ContractEventDetails) -> Self {
        Self::new(MessageType::ContractEvent, details)
    }
}

impl Message<ContractEventFilter> {
    /// A `FILTER_ADDED` message.
    #[must_use]
    pub fn filter_added(filter: ContractEventFilter) -> Self {
        Self::new(MessageType::FilterAdded, filter)
    }

    /// A `FILTER_REMOVED` message.
    #[must_use]
    pub fn filter_removed(filter: ContractEventFilter) -> Self {
        Self::new(MessageType::FilterRemoved, filter)
    }
}
