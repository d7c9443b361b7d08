//! Core services of the balance monitor.
//!
//! - blockchain: Solana RPC transports, the failover endpoint pool and the client on top of it
//! - balance: periodic balance polling with published state

pub mod balance;
pub mod blockchain;
