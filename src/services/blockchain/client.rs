//! Solana client bound to one owner account and token mint.
//!
//! Every call goes through the endpoint pool, so callers never see which
//! endpoint served it.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::services::{
	balance::BalanceSource,
	blockchain::{transports::SolanaRpc, BlockChainError, EndpointPool},
};

/// Client for the account and token the monitor watches
#[derive(Debug)]
pub struct SolanaClient<T> {
	pool: Arc<EndpointPool<T>>,
	owner: String,
	mint: String,
}

impl<T> Clone for SolanaClient<T> {
	fn clone(&self) -> Self {
		Self {
			pool: self.pool.clone(),
			owner: self.owner.clone(),
			mint: self.mint.clone(),
		}
	}
}

impl<T: SolanaRpc> SolanaClient<T> {
	pub fn new(
		pool: Arc<EndpointPool<T>>,
		owner: impl Into<String>,
		mint: impl Into<String>,
	) -> Self {
		Self {
			pool,
			owner: owner.into(),
			mint: mint.into(),
		}
	}

	pub fn pool(&self) -> &Arc<EndpointPool<T>> {
		&self.pool
	}

	/// Token balance of the configured owner, retried per the pool policy
	pub async fn get_balance(&self) -> Result<Decimal, BlockChainError> {
		let commitment = self.pool.commitment();
		self.pool
			.execute_with_retry(|transport| {
				let owner = self.owner.clone();
				let mint = self.mint.clone();
				async move {
					transport
						.get_token_balance(&owner, &mint, commitment)
						.await
				}
			})
			.await
	}

	/// Current block height of whichever endpoint serves the call
	pub async fn get_block_height(&self) -> Result<u64, BlockChainError> {
		let commitment = self.pool.commitment();
		self.pool
			.execute_with_retry(|transport| async move {
				transport.get_block_height(commitment).await
			})
			.await
	}

	/// Submits a signed, base64 encoded transaction and returns its signature
	///
	/// The payload is checked to be valid base64 before anything is sent.
	pub async fn send_transaction(&self, payload: &str) -> Result<String, BlockChainError> {
		if payload.is_empty() || STANDARD.decode(payload).is_err() {
			return Err(BlockChainError::request_error(
				"Transaction payload must be non-empty base64",
			));
		}

		let commitment = self.pool.commitment();
		let signature = self
			.pool
			.execute_with_retry(|transport| {
				let payload = payload.to_string();
				async move { transport.send_transaction(&payload, commitment).await }
			})
			.await?;

		tracing::info!(%signature, "Transaction submitted");
		Ok(signature)
	}
}

#[async_trait]
impl<T: SolanaRpc + 'static> BalanceSource for SolanaClient<T> {
	async fn fetch_balance(&self) -> Result<Decimal, BlockChainError> {
		self.get_balance().await
	}
}
