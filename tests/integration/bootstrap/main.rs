use serde_json::json;
use std::{io::Write, path::PathBuf, sync::Arc};
use tempfile::{Builder, TempDir};

use solana_balance_monitor::{
	bootstrap::{load_config, resolve_config_path, AppContext, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH},
	models::{Commitment, ConfigError},
};

use crate::integration::mocks::{MINT, OWNER};

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
	let path = dir.path().join(name);
	let mut file = std::fs::File::create(&path).unwrap();
	file.write_all(content.as_bytes()).unwrap();
	path
}

#[test]
fn test_load_config_applies_defaults() {
	let dir = Builder::new().prefix("monitor").tempdir().unwrap();
	let path = write_config(
		&dir,
		"monitor.json",
		&json!({
			"rpc_urls": [
				"https://api.mainnet-beta.solana.com",
				"https://solana-rpc.publicnode.com"
			],
			"owner": OWNER,
			"mint": MINT,
		})
		.to_string(),
	);

	let config = load_config(Some(&path)).unwrap();

	assert_eq!(config.rpc_urls.len(), 2);
	assert_eq!(config.commitment, Commitment::Processed);
	assert_eq!(config.connection_timeout_ms, 60_000);
	assert_eq!(config.probe_timeout_ms, 15_000);
	assert_eq!(config.max_retries, 3);
	assert_eq!(config.retry_delay_ms, 1_000);
	assert_eq!(config.refresh_interval_ms, 30_000);
	assert!(!config.disable_retry_on_rate_limit);
}

#[test]
fn test_load_config_reports_missing_file() {
	let dir = TempDir::new().unwrap();

	let result = load_config(Some(&dir.path().join("absent.json")));

	assert!(matches!(result, Err(ConfigError::FileError(_))));
}

#[test]
fn test_load_config_rejects_invalid_endpoint_list() {
	let dir = TempDir::new().unwrap();
	let path = write_config(
		&dir,
		"monitor.json",
		&json!({ "rpc_urls": [], "owner": OWNER, "mint": MINT }).to_string(),
	);

	let result = load_config(Some(&path));

	assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_load_config_rejects_malformed_json() {
	let dir = TempDir::new().unwrap();
	let path = write_config(&dir, "monitor.json", "{ \"rpc_urls\": [");

	let result = load_config(Some(&path));

	assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_config_path_resolution_order() {
	std::env::remove_var(CONFIG_PATH_ENV);
	assert_eq!(resolve_config_path(None), PathBuf::from(DEFAULT_CONFIG_PATH));

	std::env::set_var(CONFIG_PATH_ENV, "/srv/monitor/prod.json");
	assert_eq!(resolve_config_path(None), PathBuf::from("/srv/monitor/prod.json"));
	assert_eq!(
		resolve_config_path(Some(&PathBuf::from("local.json"))),
		PathBuf::from("local.json")
	);
	std::env::remove_var(CONFIG_PATH_ENV);
}

#[tokio::test]
async fn test_context_builds_pool_from_loaded_config() {
	let dir = TempDir::new().unwrap();
	let path = write_config(
		&dir,
		"monitor.json",
		&json!({
			"rpc_urls": ["https://api.devnet.solana.com", "https://devnet.helius-rpc.com"],
			"owner": OWNER,
			"mint": MINT,
			"commitment": "finalized",
		})
		.to_string(),
	);
	let context = AppContext::new(load_config(Some(&path)).unwrap());

	let pool = context.pool().await.unwrap();
	let client = context.client().await.unwrap();

	assert!(Arc::ptr_eq(&pool, client.pool()));
	assert_eq!(pool.commitment(), Commitment::Finalized);
	let urls: Vec<String> = pool.statuses().into_iter().map(|s| s.url).collect();
	assert_eq!(urls, context.config().rpc_urls);
}
