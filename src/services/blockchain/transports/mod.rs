//! Network transport implementations for Solana RPC endpoints.
//!
//! `SolanaRpc` is the contract the endpoint pool drives: one implementation
//! per endpoint, created once and reused for every call. The HTTP JSON-RPC
//! implementation lives in `http`.

mod http;

pub use http::{
	parse_block_height, parse_signature, parse_token_balance, SolanaTransportClient,
	SPL_TOKEN_PROGRAM_ID,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::{models::Commitment, services::blockchain::BlockChainError};

/// Remote operations the monitor needs from a Solana RPC endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SolanaRpc: Send + Sync {
	/// Current block height; used as the liveness probe
	async fn get_block_height(&self, commitment: Commitment) -> Result<u64, BlockChainError>;

	/// Balance of `mint` held by token accounts of `owner`, in UI units
	async fn get_token_balance(
		&self,
		owner: &str,
		mint: &str,
		commitment: Commitment,
	) -> Result<Decimal, BlockChainError>;

	/// Submits an already signed, base64 encoded transaction and returns its signature
	async fn send_transaction(
		&self,
		payload: &str,
		commitment: Commitment,
	) -> Result<String, BlockChainError>;
}

/// Builds a JSON-RPC 2.0 request body
pub fn rpc_request(id: u64, method: &str, params: Value) -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": id,
		"method": method,
		"params": params,
	})
}
