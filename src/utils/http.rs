use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	policies::ExponentialBackoff, Jitter, RetryTransientMiddleware, Retryable, RetryableStrategy,
};
use std::time::Duration;

/// Configuration for transport-level retries of rate limited requests
#[derive(Debug, Clone)]
pub struct HttpRetryConfig {
	/// Maximum number of retries for a rate limited request
	pub max_retries: u32,
	/// Base duration for exponential backoff calculations
	pub base_for_backoff: u32,
	/// Initial backoff duration before the first retry
	pub initial_backoff: Duration,
	/// Maximum backoff duration for retries
	pub max_backoff: Duration,
	/// Jitter to apply to the backoff duration
	pub jitter: Jitter,
}

impl Default for HttpRetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_for_backoff: 2,
			initial_backoff: Duration::from_millis(500),
			max_backoff: Duration::from_secs(8),
			jitter: Jitter::Full,
		}
	}
}

/// Retries only HTTP 429 responses.
///
/// Every other status and all network errors are handed back untouched so the
/// endpoint pool can decide whether to fail over.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitRetryStrategy;

impl RetryableStrategy for RateLimitRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
				tracing::debug!(url = %response.url(), "Rate limited, backing off");
				Some(Retryable::Transient)
			}
			Ok(_) => None,
			Err(_) => Some(Retryable::Fatal),
		}
	}
}

/// Creates the HTTP client shared by one RPC endpoint handle
///
/// # Parameters:
/// - `timeout`: Per-request timeout
/// - `rate_limit_retry`: Retry configuration for 429 responses, `None` disables the middleware
///
/// # Returns
/// A `ClientWithMiddleware`, or the builder error if the base client cannot be created
pub fn create_rpc_http_client(
	timeout: Duration,
	rate_limit_retry: Option<&HttpRetryConfig>,
) -> Result<ClientWithMiddleware, reqwest::Error> {
	let base_client = reqwest::Client::builder()
		.timeout(timeout)
		.pool_idle_timeout(Some(Duration::from_secs(90)))
		.build()?;

	let client = match rate_limit_retry {
		Some(config) => {
			let retry_policy = ExponentialBackoff::builder()
				.base(config.base_for_backoff)
				.retry_bounds(config.initial_backoff, config.max_backoff)
				.jitter(config.jitter)
				.build_with_max_retries(config.max_retries);

			ClientBuilder::new(base_client).with(
				RetryTransientMiddleware::new_with_policy_and_strategy(
					retry_policy,
					RateLimitRetryStrategy,
				),
			)
		}
		None => ClientBuilder::new(base_client),
	}
	.build();

	Ok(client)
}
