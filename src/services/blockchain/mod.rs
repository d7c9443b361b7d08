//! Solana RPC access with endpoint failover.
//!
//! - Transport trait and HTTP JSON-RPC implementation
//! - Endpoint pool: health probing, round-robin failover, retry with backoff
//! - Client bound to the watched owner account and token mint
//! - Error handling for blockchain operations

mod client;
mod error;
mod pool;
mod transports;

pub use client::SolanaClient;
pub use error::BlockChainError;
pub use pool::{EndpointPool, PoolSettings, SelectedEndpoint};
pub use transports::{
	parse_block_height, parse_signature, parse_token_balance, rpc_request, SolanaRpc,
	SolanaTransportClient, SPL_TOKEN_PROGRAM_ID,
};
