//! Bootstrap module for wiring the monitor's services together.
//!
//! `AppContext` is owned by the top-level process and passed by reference to
//! everything that needs RPC access. It builds the endpoint pool exactly once,
//! on first use, even when several tasks ask for it at the same time.
//!
//! # Services
//! - `EndpointPool`: failover pool over the configured RPC URLs
//! - `SolanaClient`: owner/mint bound client on top of the pool
//! - `BalancePoller`: periodic balance refresh for consumers

use std::{
	env,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::sync::OnceCell;

use crate::{
	models::{ConfigError, ConfigLoader, MonitorConfig},
	services::{
		balance::{BalancePoller, PollerHandle},
		blockchain::{BlockChainError, EndpointPool, SolanaClient, SolanaTransportClient},
	},
};

/// Environment variable that overrides the configuration path
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG_PATH";

/// Configuration path used when neither the CLI nor the environment names one
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.json";

pub type HttpPool = EndpointPool<SolanaTransportClient>;
pub type HttpClient = SolanaClient<SolanaTransportClient>;

/// Resolves the configuration path: explicit path, then environment, then default
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
	explicit
		.map(Path::to_path_buf)
		.or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
		.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads and validates the monitor configuration
pub fn load_config(explicit: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
	let path = resolve_config_path(explicit);
	tracing::info!(path = %path.display(), "Loading configuration");
	MonitorConfig::load_from_path(&path)
}

/// Application context holding configuration and the lazily built endpoint pool
pub struct AppContext {
	config: MonitorConfig,
	pool: OnceCell<Arc<HttpPool>>,
}

impl AppContext {
	pub fn new(config: MonitorConfig) -> Self {
		Self {
			config,
			pool: OnceCell::new(),
		}
	}

	pub fn config(&self) -> &MonitorConfig {
		&self.config
	}

	/// The endpoint pool, built on first call
	///
	/// Concurrent first callers all observe the same instance; if construction
	/// fails the next caller tries again.
	pub async fn pool(&self) -> Result<Arc<HttpPool>, BlockChainError> {
		self.pool
			.get_or_try_init(|| async {
				let pool = EndpointPool::from_config(&self.config)?;
				tracing::info!(endpoints = pool.len(), "Endpoint pool initialized");
				Ok::<_, BlockChainError>(Arc::new(pool))
			})
			.await
			.cloned()
	}

	/// Client for the configured owner and mint
	pub async fn client(&self) -> Result<HttpClient, BlockChainError> {
		let pool = self.pool().await?;
		Ok(SolanaClient::new(
			pool,
			self.config.owner.clone(),
			self.config.mint.clone(),
		))
	}

	/// Attaches a balance poller using the configured refresh interval
	pub async fn start_balance_poller(
		&self,
	) -> Result<PollerHandle<HttpClient>, BlockChainError> {
		let client = self.client().await?;
		Ok(BalancePoller::new(Arc::new(client), self.config.refresh_interval()).start())
	}
}
