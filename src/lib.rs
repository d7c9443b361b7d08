//! Solana balance monitor library.
//!
//! Keeps a pool of interchangeable Solana JSON-RPC endpoints healthy, runs
//! remote calls against them with failover and exponential backoff, and
//! publishes a periodically refreshed SPL token balance to consumers.
//!
//! # Architecture
//! - Endpoint pool: ordered endpoints, health probing, retrying execution
//! - Solana client: balance, block height and transaction submission on top of the pool
//! - Balance poller: single in-flight fetch, stale-on-failure published state
//!
//! # Flow
//! 1. Load configuration
//! 2. Build the endpoint pool once through the application context
//! 3. Attach a poller that refreshes the balance on a fixed interval
//! 4. Consumers read or subscribe to the published state and may request a refetch

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
