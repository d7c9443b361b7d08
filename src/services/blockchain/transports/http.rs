//! HTTP JSON-RPC transport for a single Solana endpoint.
//!
//! Each `SolanaTransportClient` owns one persistent HTTP client (connection
//! pool, timeout and optional 429 retry middleware) for exactly one URL.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde_json::{json, Value};
use std::{
	str::FromStr,
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};

use crate::{
	models::Commitment,
	services::blockchain::{
		transports::{rpc_request, SolanaRpc},
		BlockChainError,
	},
	utils::{create_rpc_http_client, HttpRetryConfig},
};

/// SPL Token program that owns every token account queried by the monitor
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGZPDyZGkN4iWk5K5qKnzV";

/// JSON-RPC client bound to one Solana RPC URL
#[derive(Debug)]
pub struct SolanaTransportClient {
	url: String,
	client: ClientWithMiddleware,
	next_id: AtomicU64,
}

impl SolanaTransportClient {
	/// Creates the client for `url`
	///
	/// # Arguments
	/// * `url` - RPC endpoint URL
	/// * `timeout` - Per-request timeout
	/// * `rate_limit_retry` - Retry configuration for HTTP 429, `None` to disable
	pub fn new(
		url: &str,
		timeout: Duration,
		rate_limit_retry: Option<&HttpRetryConfig>,
	) -> Result<Self, BlockChainError> {
		let client = create_rpc_http_client(timeout, rate_limit_retry).map_err(|e| {
			BlockChainError::internal_error(format!("Failed to create HTTP client: {}", e))
		})?;

		Ok(Self {
			url: url.to_string(),
			client,
			next_id: AtomicU64::new(1),
		})
	}

	/// Sends one JSON-RPC call and returns its `result` member
	async fn call(&self, method: &str, params: Value) -> Result<Value, BlockChainError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = rpc_request(id, method, params);

		let response = self.client.post(&self.url).json(&body).send().await?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			tracing::warn!(url = %self.url, %status, method, "RPC request failed");
			return Err(BlockChainError::connection_error(format!(
				"{} returned HTTP {}: {}",
				self.url, status, error_body
			)));
		}

		let mut payload: Value = response.json().await.map_err(|e| {
			BlockChainError::request_error(format!(
				"Failed to parse JSON response from {}: {}",
				self.url, e
			))
		})?;

		if let Some(error) = payload.get("error") {
			let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
			let message = error
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error");
			return Err(BlockChainError::request_error(format!(
				"{} failed on {} with code {}: {}",
				method, self.url, code, message
			)));
		}

		match payload.get_mut("result") {
			Some(result) => Ok(result.take()),
			None => Err(BlockChainError::request_error(format!(
				"{} response from {} has no result",
				method, self.url
			))),
		}
	}
}

#[async_trait]
impl SolanaRpc for SolanaTransportClient {
	async fn get_block_height(&self, commitment: Commitment) -> Result<u64, BlockChainError> {
		let result = self
			.call(
				"getBlockHeight",
				json!([{ "commitment": commitment.as_str() }]),
			)
			.await?;
		parse_block_height(&result)
	}

	async fn get_token_balance(
		&self,
		owner: &str,
		mint: &str,
		commitment: Commitment,
	) -> Result<Decimal, BlockChainError> {
		let result = self
			.call(
				"getTokenAccountsByOwner",
				json!([
					owner,
					{ "programId": SPL_TOKEN_PROGRAM_ID },
					{ "encoding": "jsonParsed", "commitment": commitment.as_str() }
				]),
			)
			.await?;
		parse_token_balance(&result, mint)
	}

	async fn send_transaction(
		&self,
		payload: &str,
		commitment: Commitment,
	) -> Result<String, BlockChainError> {
		let result = self
			.call(
				"sendTransaction",
				json!([
					payload,
					{ "encoding": "base64", "preflightCommitment": commitment.as_str() }
				]),
			)
			.await?;
		parse_signature(&result)
	}
}

/// Reads the `getBlockHeight` result
pub fn parse_block_height(result: &Value) -> Result<u64, BlockChainError> {
	result.as_u64().ok_or_else(|| {
		BlockChainError::request_error(format!("Invalid block height in response: {}", result))
	})
}

/// Reads the balance of `mint` out of a jsonParsed `getTokenAccountsByOwner` result
///
/// The first account holding the mint wins. An owner without such an account
/// has a balance of zero.
pub fn parse_token_balance(result: &Value, mint: &str) -> Result<Decimal, BlockChainError> {
	let accounts = result
		.get("value")
		.and_then(Value::as_array)
		.ok_or_else(|| BlockChainError::request_error("Token accounts response has no value"))?;

	let token_amount = accounts.iter().find_map(|account| {
		let info = account.pointer("/account/data/parsed/info")?;
		(info.get("mint")?.as_str()? == mint).then(|| info.get("tokenAmount"))?
	});

	let Some(token_amount) = token_amount else {
		return Ok(Decimal::ZERO);
	};

	if let Some(ui_amount) = token_amount.get("uiAmountString").and_then(Value::as_str) {
		return Decimal::from_str(ui_amount).map_err(|e| {
			BlockChainError::request_error(format!("Invalid uiAmountString {}: {}", ui_amount, e))
		});
	}

	if let Some(ui_amount) = token_amount.get("uiAmount").and_then(Value::as_f64) {
		return Decimal::from_f64(ui_amount).ok_or_else(|| {
			BlockChainError::request_error(format!("Invalid uiAmount {}", ui_amount))
		});
	}

	// Older nodes omit both UI fields; rebuild the amount from raw units and decimals
	let amount = token_amount
		.get("amount")
		.and_then(Value::as_str)
		.and_then(|raw| raw.parse::<i128>().ok());
	let decimals = token_amount
		.get("decimals")
		.and_then(Value::as_u64)
		.and_then(|d| u32::try_from(d).ok());

	match (amount, decimals) {
		(Some(amount), Some(decimals)) => Decimal::try_from_i128_with_scale(amount, decimals)
			.map_err(|e| BlockChainError::request_error(format!("Invalid token amount: {}", e))),
		_ => Err(BlockChainError::request_error(format!(
			"Token amount for mint {} is malformed: {}",
			mint, token_amount
		))),
	}
}

/// Reads the transaction signature returned by `sendTransaction`
pub fn parse_signature(result: &Value) -> Result<String, BlockChainError> {
	result
		.as_str()
		.map(str::to_string)
		.ok_or_else(|| BlockChainError::request_error(format!("Invalid signature: {}", result)))
}
