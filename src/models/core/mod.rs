//! Core domain models for the balance monitor.
//!
//! - Commitment: Solana confirmation level sent with every query
//! - EndpointStatus: point-in-time view of one pooled RPC endpoint
//! - BalanceState: the value published by the balance poller

mod balance;
mod commitment;
mod endpoint;

pub use balance::BalanceState;
pub use commitment::Commitment;
pub use endpoint::EndpointStatus;
