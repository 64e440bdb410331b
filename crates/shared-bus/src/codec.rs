//! # Wire Codec
//!
//! JSON encoding of `Message<T>`. The codec preserves `id`, `type` and
//! `details` and nothing else is assumed about the format.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::Message;

use crate::bus::{BusError, BusRecord};

/// Encode a message into a record for `topic`, routed by `key`.
///
/// # Errors
///
/// `BusError::Codec` if the payload cannot be serialised (e.g. a filter
/// carrying an in-process custom correlation strategy).
pub fn encode_record<T: Serialize>(
    topic: &str,
    key: &str,
    message: &Message<T>,
) -> Result<BusRecord, BusError> {
    let payload = serde_json::to_vec(message).map_err(|e| BusError::Codec(e.to_string()))?;
    Ok(BusRecord::new(topic, key, payload))
}

/// Decode a record payload into a message.
///
/// # Errors
///
/// `BusError::Codec` if the payload is not a valid `Message<T>`.
pub fn decode_message<T: DeserializeOwned>(payload: &[u8]) -> Result<Message<T>, BusError> {
    serde_json::from_slice(payload).map_err(|e| BusError::Codec(e.to_string()))
}
