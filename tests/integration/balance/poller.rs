use mockito::Server;
use rust_decimal::Decimal;
use serde_json::json;
use std::{str::FromStr, time::Duration};
use tokio::sync::watch;

use solana_balance_monitor::{
	bootstrap::AppContext,
	models::BalanceState,
	services::balance::{FetchOutcome, FETCH_ERROR_MESSAGE},
};

use crate::integration::mocks::{mock_method, rpc_result, test_config, token_accounts};

async fn wait_until_loaded(updates: &mut watch::Receiver<BalanceState>) -> BalanceState {
	tokio::time::timeout(Duration::from_secs(5), updates.wait_for(|state| !state.loading))
		.await
		.expect("poller settled in time")
		.expect("poller still attached")
		.clone()
}

#[tokio::test]
async fn test_poller_publishes_initial_balance() {
	let mut server = Server::new_async().await;
	let balance = mock_method(
		&mut server,
		"getTokenAccountsByOwner",
		200,
		rpc_result(token_accounts("12.5")),
	)
	.await;

	let context = AppContext::new(test_config(vec![server.url()]));
	let poller = context.start_balance_poller().await.unwrap();
	assert!(poller.state().loading);

	let state = wait_until_loaded(&mut poller.subscribe()).await;

	assert_eq!(state.value, Decimal::from_str("12.5").unwrap());
	assert!(state.error.is_none());
	assert!(state.last_updated.is_some());
	balance.assert_async().await;
}

#[tokio::test]
async fn test_poller_keeps_last_value_when_refresh_fails() {
	let mut server = Server::new_async().await;
	let balance = mock_method(
		&mut server,
		"getTokenAccountsByOwner",
		200,
		rpc_result(token_accounts("40")),
	)
	.await;

	let context = AppContext::new(test_config(vec![server.url()]));
	let poller = context.start_balance_poller().await.unwrap();
	let loaded = wait_until_loaded(&mut poller.subscribe()).await;
	assert_eq!(loaded.value, Decimal::from(40));

	// The endpoint goes down: queries fail and the health probe fails too
	balance.remove_async().await;
	let _down = server.mock("POST", "/").with_status(503).create_async().await;

	assert_eq!(poller.refetch().await, FetchOutcome::Failed);

	let state = poller.state();
	assert_eq!(state.value, Decimal::from(40));
	assert_eq!(state.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
	assert!(!state.loading);
	assert_eq!(state.last_updated, loaded.last_updated);
}

#[tokio::test]
async fn test_poller_recovers_after_failed_refresh() {
	let mut server = Server::new_async().await;
	let down = server.mock("POST", "/").with_status(500).create_async().await;

	let context = AppContext::new(test_config(vec![server.url()]));
	let poller = context.start_balance_poller().await.unwrap();
	let failed = wait_until_loaded(&mut poller.subscribe()).await;
	assert_eq!(failed.value, Decimal::ZERO);
	assert_eq!(failed.error.as_deref(), Some(FETCH_ERROR_MESSAGE));

	down.remove_async().await;
	let _probe = mock_method(&mut server, "getBlockHeight", 200, rpc_result(json!(88))).await;
	let _balance = mock_method(
		&mut server,
		"getTokenAccountsByOwner",
		200,
		rpc_result(token_accounts("3.25")),
	)
	.await;

	assert_eq!(poller.refetch().await, FetchOutcome::Updated);

	let state = poller.state();
	assert_eq!(state.value, Decimal::from_str("3.25").unwrap());
	assert!(state.error.is_none());
	assert!(context.pool().await.unwrap().statuses()[0].healthy);
}

#[tokio::test]
async fn test_stopped_poller_ignores_refetch() {
	let mut server = Server::new_async().await;
	let _balance = mock_method(
		&mut server,
		"getTokenAccountsByOwner",
		200,
		rpc_result(token_accounts("1")),
	)
	.await;

	let context = AppContext::new(test_config(vec![server.url()]));
	let poller = context.start_balance_poller().await.unwrap();
	wait_until_loaded(&mut poller.subscribe()).await;

	poller.stop();
	poller.stop();

	assert!(poller.is_detached());
	assert_eq!(poller.refetch().await, FetchOutcome::Skipped);
	assert_eq!(poller.state().value, Decimal::from(1));
}
