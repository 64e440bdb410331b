//! # Filter Event Consumer
//!
//! Applies `FILTER_ADDED` / `FILTER_REMOVED` messages from the filter events
//! topic to the local subscription service.
//!
//! ## Dispatch
//!
//! | Type tag | Handler | Subscription call | Absorbed errors |
//! |----------|---------|-------------------|-----------------|
//! | `FILTER_ADDED` | `RegisterFilter` | `register_contract_event_filter(filter, false)` | none |
//! | `FILTER_REMOVED` | `UnregisterFilter` | `unregister_contract_event_filter(id, false)` | `FilterNotFound` |
//! | anything else | none | none | message logged and dropped |
//!
//! Changes arriving from the bus are never locally originated, so the
//! subscription service does not announce them again.
//!
//! ## Per-Filter State
//!
//! ```text
//! [UNKNOWN] ──FILTER_ADDED──→ [REGISTERED] ──FILTER_REMOVED──→ [UNREGISTERED]
//!                                                                 │
//!                                      FILTER_REMOVED (absorbed) ─┘
//! ```
//!
//! The dispatch table is built once and never mutated, so concurrent
//! deliveries read it without locking.

pub mod consumer;
pub mod dispatch;
pub mod error;
pub mod ports;

pub use consumer::FilterEventConsumer;
pub use dispatch::{DispatchOutcome, DispatchTable, FilterHandler};
pub use error::ConsumerError;
pub use ports::SubscriptionService;
