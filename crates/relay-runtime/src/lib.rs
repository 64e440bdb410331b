//! # Relay Runtime Library
//!
//! This library exposes the internal modules of the relay runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Layout
//!
//! - `container`: configuration loaded from the environment
//! - `adapters`: filter store, subscription service, metered bus
//! - `handlers`: the filter events consumer loop
//! - `wiring`: `RelayNode`, which connects everything to one bus

#![allow(clippy::type_complexity)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod wiring;

pub use container::{ConfigError, RelayConfig};
pub use wiring::RelayNode;
