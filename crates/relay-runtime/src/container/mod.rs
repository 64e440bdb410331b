//! Configuration container for the relay node.

pub mod config;

pub use config::{ConfigError, NodeIdentity, RelayConfig};
