//! Blockchain error types and handling.
//!
//! Errors produced while talking to Solana RPC endpoints, selecting a healthy
//! endpoint, or running an operation through the retrying endpoint pool.

use log::error;
use thiserror::Error;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug, Error)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues (timeouts, refused connections, 5xx)
	#[error("Connection error: {0}")]
	ConnectionError(String),

	/// Errors related to malformed requests, JSON-RPC errors or invalid responses
	#[error("Request error: {0}")]
	RequestError(String),

	/// Every endpoint in the pool failed its probe during one scan
	#[error("No healthy RPC endpoint available ({endpoints} probed)")]
	NoHealthyEndpoint { endpoints: usize },

	/// The operation kept failing until the retry budget was exhausted
	#[error("Operation failed after {attempts} attempts: {source}")]
	OperationFailed {
		attempts: u32,
		#[source]
		source: Box<BlockChainError>,
	},

	/// Internal errors within the client
	#[error("Internal error: {0}")]
	InternalError(String),
}

impl BlockChainError {
	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error);
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error);
		error
	}

	/// Creates a new no-healthy-endpoint error with logging
	pub fn no_healthy_endpoint(endpoints: usize) -> Self {
		let error = Self::NoHealthyEndpoint { endpoints };
		error!("{}", error);
		error
	}

	/// Wraps the last observed error once retries are exhausted
	pub fn operation_failed(attempts: u32, last_error: BlockChainError) -> Self {
		let error = Self::OperationFailed {
			attempts,
			source: Box::new(last_error),
		};
		error!("{}", error);
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error);
		error
	}
}

impl From<reqwest_middleware::Error> for BlockChainError {
	fn from(err: reqwest_middleware::Error) -> Self {
		Self::connection_error(err.to_string())
	}
}

impl From<reqwest::Error> for BlockChainError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			Self::request_error(err.to_string())
		} else {
			Self::connection_error(err.to_string())
		}
	}
}
