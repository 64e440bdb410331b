//! # Event Broadcaster
//!
//! Turns domain events into bus messages.
//!
//! ## Purpose
//!
//! - `broadcast_new_block`: one `BLOCK` message on the block events topic,
//!   keyed by its own message id.
//! - `broadcast_contract_event`: one `CONTRACT_EVENT` message on the contract
//!   events topic, keyed by the correlation key of the producing filter.
//! - `broadcast_filter_added` / `broadcast_filter_removed`: lifecycle
//!   announcements on the filter events topic for locally originated changes.
//!
//! ## Correlation Key Resolution
//!
//! ```text
//! filterId ──find_by_id──→ None ─────────────────────────→ message id
//!                     └──→ Some(filter) ── no strategy ──→ message id
//!                                      └── strategy ─────→ strategy(event)
//! ```
//!
//! The filter is looked up on every publish. A missing filter is an expected
//! race with filter removal, not an error.
//!
//! ## Module Structure
//!
//! ```text
//! ports/inbound.rs   - BlockchainEventBroadcaster, FilterEventBroadcaster
//! ports/outbound.rs  - FilterRepository
//! correlation.rs     - CorrelationKeyResolver
//! broadcaster.rs     - BusEventBroadcaster
//! filter_events.rs   - BusFilterEventBroadcaster
//! error.rs           - BroadcastError
//! ```

pub mod broadcaster;
pub mod correlation;
pub mod error;
pub mod filter_events;
pub mod ports;

pub use broadcaster::BusEventBroadcaster;
pub use correlation::CorrelationKeyResolver;
pub use error::BroadcastError;
pub use filter_events::BusFilterEventBroadcaster;
pub use ports::{BlockchainEventBroadcaster, FilterEventBroadcaster, FilterRepository};
