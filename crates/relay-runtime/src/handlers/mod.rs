//! # Bus Handlers
//!
//! Long-running loops that consume bus topics. Each handler owns its
//! subscription and is spawned by the wiring layer with a shutdown guard.

pub mod filter_events;

pub use filter_events::FilterEventsHandler;
