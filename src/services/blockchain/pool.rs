//! Failover pool of Solana RPC endpoints.
//!
//! The pool owns a fixed, ordered set of endpoints, each with a persistent
//! transport and a health flag. Callers either ask for a healthy endpoint or
//! hand the pool an operation to run with failover and exponential backoff.
//!
//! Health flags and the cursor are atomics so the pool can be shared across
//! tasks of a multi-threaded runtime. Health scans are serialized by
//! `scan_lock`; only `acquire_healthy_endpoint`, `probe_all` and the
//! failure path of `execute_with_retry` write pool state.

use futures::future::join_all;
use std::{
	collections::HashSet,
	future::Future,
	sync::{
		atomic::{AtomicBool, AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};
use tokio::sync::Mutex;

use crate::{
	models::{Commitment, EndpointStatus, MonitorConfig},
	services::blockchain::{
		transports::{SolanaRpc, SolanaTransportClient},
		BlockChainError,
	},
	utils::{HttpRetryConfig, RetryPolicy},
};

/// One pooled endpoint: its URL, transport and last known health
#[derive(Debug)]
struct Endpoint<T> {
	url: String,
	transport: Arc<T>,
	healthy: AtomicBool,
}

/// An endpoint handed out by the pool
#[derive(Debug)]
pub struct SelectedEndpoint<T> {
	pub index: usize,
	pub url: String,
	pub transport: Arc<T>,
}

/// Connection parameters shared by every endpoint of a pool
#[derive(Debug, Clone)]
pub struct PoolSettings {
	pub commitment: Commitment,
	/// Timeout of a single liveness probe
	pub probe_timeout: Duration,
	pub retry_policy: RetryPolicy,
}

impl Default for PoolSettings {
	fn default() -> Self {
		Self {
			commitment: Commitment::default(),
			probe_timeout: Duration::from_secs(15),
			retry_policy: RetryPolicy::default(),
		}
	}
}

/// Ordered pool of interchangeable RPC endpoints with health tracking
#[derive(Debug)]
pub struct EndpointPool<T> {
	endpoints: Vec<Endpoint<T>>,
	cursor: AtomicUsize,
	scan_lock: Mutex<()>,
	settings: PoolSettings,
}

impl EndpointPool<SolanaTransportClient> {
	/// Builds one HTTP transport per configured URL
	///
	/// # Arguments
	/// * `config` - Monitor configuration with the ordered RPC URLs and connection parameters
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - The pool, or an error if a transport cannot be built
	pub fn from_config(config: &MonitorConfig) -> Result<Self, BlockChainError> {
		let rate_limit_retry =
			(!config.disable_retry_on_rate_limit).then(HttpRetryConfig::default);

		let endpoints = config
			.rpc_urls
			.iter()
			.map(|url| {
				let transport = SolanaTransportClient::new(
					url,
					config.connection_timeout(),
					rate_limit_retry.as_ref(),
				)?;
				Ok((url.clone(), transport))
			})
			.collect::<Result<Vec<_>, BlockChainError>>()?;

		Self::new(
			endpoints,
			PoolSettings {
				commitment: config.commitment,
				probe_timeout: config.probe_timeout(),
				retry_policy: config.retry_policy(),
			},
		)
	}
}

impl<T: SolanaRpc> EndpointPool<T> {
	/// Creates a pool from already constructed transports
	///
	/// Every endpoint starts healthy and the cursor starts at the first one.
	/// Fails when the list is empty or a URL appears twice.
	pub fn new(
		endpoints: Vec<(String, T)>,
		settings: PoolSettings,
	) -> Result<Self, BlockChainError> {
		if endpoints.is_empty() {
			return Err(BlockChainError::internal_error(
				"Endpoint pool requires at least one endpoint",
			));
		}

		let mut seen = HashSet::new();
		if let Some((url, _)) = endpoints.iter().find(|(url, _)| !seen.insert(url.clone())) {
			return Err(BlockChainError::internal_error(format!(
				"Duplicate endpoint in pool: {}",
				url
			)));
		}

		let endpoints = endpoints
			.into_iter()
			.map(|(url, transport)| Endpoint {
				url,
				transport: Arc::new(transport),
				healthy: AtomicBool::new(true),
			})
			.collect();

		Ok(Self {
			endpoints,
			cursor: AtomicUsize::new(0),
			scan_lock: Mutex::new(()),
			settings,
		})
	}

	pub fn len(&self) -> usize {
		self.endpoints.len()
	}

	/// Always false; a pool is never constructed empty
	pub fn is_empty(&self) -> bool {
		self.endpoints.is_empty()
	}

	pub fn commitment(&self) -> Commitment {
		self.settings.commitment
	}

	pub fn current_index(&self) -> usize {
		self.cursor.load(Ordering::SeqCst)
	}

	/// Current URL, health and cursor position of every endpoint
	pub fn statuses(&self) -> Vec<EndpointStatus> {
		let current = self.current_index();
		self.endpoints
			.iter()
			.enumerate()
			.map(|(index, endpoint)| EndpointStatus {
				url: endpoint.url.clone(),
				healthy: endpoint.healthy.load(Ordering::SeqCst),
				current: index == current,
			})
			.collect()
	}

	fn select(&self, index: usize) -> SelectedEndpoint<T> {
		let endpoint = &self.endpoints[index];
		SelectedEndpoint {
			index,
			url: endpoint.url.clone(),
			transport: endpoint.transport.clone(),
		}
	}

	fn set_healthy(&self, index: usize, healthy: bool) {
		self.endpoints[index].healthy.store(healthy, Ordering::SeqCst);
	}

	/// Liveness check of the endpoint at `index`
	///
	/// Healthy only when the block height query succeeds within the probe
	/// timeout and reports a height above zero. A zero height means the node is
	/// misconfigured or not synced. Errors never escape; they read as unhealthy.
	pub async fn probe(&self, index: usize) -> bool {
		let endpoint = &self.endpoints[index];
		let probe = endpoint.transport.get_block_height(self.settings.commitment);

		match tokio::time::timeout(self.settings.probe_timeout, probe).await {
			Ok(Ok(height)) if height > 0 => {
				tracing::debug!(url = %endpoint.url, height, "Probe succeeded");
				true
			}
			Ok(Ok(height)) => {
				tracing::debug!(
					url = %endpoint.url,
					height,
					"Probe returned a non-positive height"
				);
				false
			}
			Ok(Err(e)) => {
				tracing::debug!(url = %endpoint.url, error = %e, "Probe failed");
				false
			}
			Err(_) => {
				tracing::debug!(
					url = %endpoint.url,
					timeout = ?self.settings.probe_timeout,
					"Probe timed out"
				);
				false
			}
		}
	}

	/// Finds a healthy endpoint, scanning round-robin from the cursor
	///
	/// Each endpoint is probed at most once per call. The first healthy one
	/// becomes current. When the scan wraps back to where it started without
	/// success, `NoHealthyEndpoint` is returned and the cursor is back at its
	/// starting position.
	pub async fn acquire_healthy_endpoint(&self) -> Result<SelectedEndpoint<T>, BlockChainError> {
		let _guard = self.scan_lock.lock().await;

		let len = self.endpoints.len();
		let start = self.current_index();

		for step in 0..len {
			let index = (start + step) % len;

			if self.probe(index).await {
				self.set_healthy(index, true);
				self.cursor.store(index, Ordering::SeqCst);
				if step > 0 {
					tracing::info!(
						from = %self.endpoints[start].url,
						to = %self.endpoints[index].url,
						"Failed over to healthy RPC endpoint"
					);
				}
				return Ok(self.select(index));
			}

			self.set_healthy(index, false);
			self.cursor.store((index + 1) % len, Ordering::SeqCst);
		}

		Err(BlockChainError::no_healthy_endpoint(len))
	}

	/// Probes every endpoint concurrently and records the results
	///
	/// Does not move the cursor.
	pub async fn probe_all(&self) -> Vec<EndpointStatus> {
		{
			let _guard = self.scan_lock.lock().await;
			let results = join_all((0..self.endpoints.len()).map(|index| self.probe(index))).await;
			for (index, healthy) in results.into_iter().enumerate() {
				self.set_healthy(index, healthy);
			}
		}
		self.statuses()
	}

	/// Runs `operation` with the pool's retry policy
	pub async fn execute_with_retry<F, Fut, R>(&self, operation: F) -> Result<R, BlockChainError>
	where
		F: Fn(Arc<T>) -> Fut,
		Fut: Future<Output = Result<R, BlockChainError>>,
	{
		self.execute_with_retries(self.settings.retry_policy.max_retries, operation)
			.await
	}

	/// Runs `operation` against a healthy endpoint, up to `max_retries + 1` times
	///
	/// The endpoint under the cursor is used as is while it is flagged healthy;
	/// otherwise a health scan picks a new one, and `NoHealthyEndpoint` from
	/// that scan is returned immediately. A failed attempt flags its endpoint
	/// unhealthy and, unless it was the last, waits `base * 2^attempt` before the
	/// next try. Exhausting every attempt yields `OperationFailed` wrapping the
	/// last error.
	pub async fn execute_with_retries<F, Fut, R>(
		&self,
		max_retries: u32,
		operation: F,
	) -> Result<R, BlockChainError>
	where
		F: Fn(Arc<T>) -> Fut,
		Fut: Future<Output = Result<R, BlockChainError>>,
	{
		let policy = self.settings.retry_policy.with_max_retries(max_retries);
		let total_attempts = policy.total_attempts();
		let mut last_error = None;

		for attempt in 1..=total_attempts {
			let index = self.current_index();
			let selected = if self.endpoints[index].healthy.load(Ordering::SeqCst) {
				self.select(index)
			} else {
				self.acquire_healthy_endpoint().await?
			};

			match operation(selected.transport).await {
				Ok(value) => return Ok(value),
				Err(e) => {
					tracing::warn!(
						url = %selected.url,
						attempt,
						total_attempts,
						error = %e,
						"RPC operation failed"
					);
					self.set_healthy(selected.index, false);
					last_error = Some(e);

					if attempt < total_attempts {
						tokio::time::sleep(policy.delay_after(attempt)).await;
					}
				}
			}
		}

		let last_error = last_error
			.unwrap_or_else(|| BlockChainError::internal_error("Operation was never attempted"));
		Err(BlockChainError::operation_failed(total_attempts, last_error))
	}
}
