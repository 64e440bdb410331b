//! Bus doubles for tests in this and downstream crates.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use shared_types::Message;

use crate::bus::{BusError, BusRecord, MessageBus};
use crate::codec::decode_message;

/// Records every published record, in order.
#[derive(Default)]
pub struct RecordingBus {
    records: Mutex<Vec<BusRecord>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records published so far.
    pub fn records(&self) -> Vec<BusRecord> {
        self.records.lock().clone()
    }

    /// Number of publish calls.
    pub fn publish_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Decode the record at `index` as a `Message<T>`.
    pub fn message_at<T: DeserializeOwned>(&self, index: usize) -> Option<(BusRecord, Message<T>)> {
        let record = self.records.lock().get(index).cloned()?;
        let message = decode_message(&record.payload).ok()?;
        Some((record, message))
    }
}

#[async_trait]
impl MessageBus for RecordingBus {
    async fn publish(&self, record: BusRecord) -> Result<(), BusError> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// Fails every publish with a transport error.
pub struct FailingBus {
    reason: String,
}

impl FailingBus {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MessageBus for FailingBus {
    async fn publish(&self, _record: BusRecord) -> Result<(), BusError> {
        Err(BusError::Transport(self.reason.clone()))
    }
}
