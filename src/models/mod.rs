//! Domain models and data structures for balance monitoring.
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (commitment levels, endpoint status, published balance state)

mod config;
mod core;

pub use config::{ConfigError, ConfigLoader, MonitorConfig};

pub use core::{BalanceState, Commitment, EndpointStatus};
