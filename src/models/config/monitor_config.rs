//! Monitor configuration loading and validation.
//!
//! A single JSON document describes the RPC endpoints, the account and token
//! to watch, connection parameters and the retry/poll timings.

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, time::Duration};
use url::Url;

use crate::{
	models::{Commitment, ConfigError, ConfigLoader},
	utils::RetryPolicy,
};

const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;

/// Static configuration for the balance monitor
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
	/// Ordered RPC endpoints; the order is the failover order
	pub rpc_urls: Vec<String>,
	/// Wallet whose token accounts are queried
	pub owner: String,
	/// SPL token mint to report the balance of
	pub mint: String,
	#[serde(default)]
	pub commitment: Commitment,
	#[serde(default = "default_connection_timeout_ms")]
	pub connection_timeout_ms: u64,
	#[serde(default = "default_probe_timeout_ms")]
	pub probe_timeout_ms: u64,
	#[serde(default)]
	pub disable_retry_on_rate_limit: bool,
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,
	#[serde(default = "default_refresh_interval_ms")]
	pub refresh_interval_ms: u64,
}

fn default_connection_timeout_ms() -> u64 {
	DEFAULT_CONNECTION_TIMEOUT_MS
}

fn default_probe_timeout_ms() -> u64 {
	DEFAULT_PROBE_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
	DEFAULT_MAX_RETRIES
}

fn default_retry_delay_ms() -> u64 {
	DEFAULT_RETRY_DELAY_MS
}

fn default_refresh_interval_ms() -> u64 {
	DEFAULT_REFRESH_INTERVAL_MS
}

impl MonitorConfig {
	pub fn connection_timeout(&self) -> Duration {
		Duration::from_millis(self.connection_timeout_ms)
	}

	pub fn probe_timeout(&self) -> Duration {
		Duration::from_millis(self.probe_timeout_ms)
	}

	pub fn refresh_interval(&self) -> Duration {
		Duration::from_millis(self.refresh_interval_ms)
	}

	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy::new(
			self.max_retries,
			Duration::from_millis(self.retry_delay_ms),
		)
	}
}

/// Base58 alphabet check for account and mint addresses (32 byte keys encode to 32..=44 chars)
fn is_base58_pubkey(value: &str) -> bool {
	(32..=44).contains(&value.len())
		&& value
			.chars()
			.all(|c| c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l'))
}

impl ConfigLoader for MonitorConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::file_error(format!(
				"config file not found: {}",
				path.display()
			)));
		}
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"config file must be JSON: {}",
				path.display()
			)));
		}

		let file = std::fs::File::open(path)?;
		let config: MonitorConfig = serde_json::from_reader(file)?;

		// Validate the config after loading
		if let Err(validation_error) = config.validate() {
			return Err(ConfigError::validation_error(validation_error));
		}

		Ok(config)
	}

	fn validate(&self) -> Result<(), String> {
		if self.rpc_urls.is_empty() {
			return Err("rpc_urls must contain at least one endpoint".to_string());
		}

		let mut seen = HashSet::new();
		for rpc_url in &self.rpc_urls {
			let parsed =
				Url::parse(rpc_url).map_err(|e| format!("Invalid RPC URL {}: {}", rpc_url, e))?;
			if !matches!(parsed.scheme(), "http" | "https") {
				return Err("All RPC URLs must start with http:// or https://".to_string());
			}
			if !seen.insert(rpc_url.as_str()) {
				return Err(format!("Duplicate RPC URL: {}", rpc_url));
			}
		}

		if !is_base58_pubkey(&self.owner) {
			return Err(format!("owner is not a valid base58 address: {}", self.owner));
		}
		if !is_base58_pubkey(&self.mint) {
			return Err(format!("mint is not a valid base58 address: {}", self.mint));
		}

		if self.connection_timeout_ms == 0 || self.probe_timeout_ms == 0 {
			return Err("Timeouts must be greater than 0".to_string());
		}
		if self.refresh_interval_ms == 0 {
			return Err("refresh_interval_ms must be greater than 0".to_string());
		}

		Ok(())
	}
}
