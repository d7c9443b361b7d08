use mockito::{Matcher, Server};
use rust_decimal::Decimal;
use serde_json::json;
use std::{str::FromStr, time::Duration};

use solana_balance_monitor::{
	models::Commitment,
	services::blockchain::{BlockChainError, SolanaRpc, SolanaTransportClient},
	utils::HttpRetryConfig,
};

use crate::integration::mocks::{
	mock_method, rpc_error, rpc_result, token_accounts, MINT, OWNER,
};

fn transport(url: &str) -> SolanaTransportClient {
	SolanaTransportClient::new(url, Duration::from_secs(2), None).unwrap()
}

#[tokio::test]
async fn test_get_block_height_sends_commitment() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::PartialJson(json!({
			"jsonrpc": "2.0",
			"method": "getBlockHeight",
			"params": [{ "commitment": "finalized" }]
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_result(json!(289_554_101u64)))
		.create_async()
		.await;

	let height = transport(&server.url())
		.get_block_height(Commitment::Finalized)
		.await
		.unwrap();

	assert_eq!(height, 289_554_101);
	mock.assert_async().await;
}

#[tokio::test]
async fn test_get_token_balance_parses_jsonparsed_accounts() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "getTokenAccountsByOwner",
			"params": [
				OWNER,
				{ "programId": "TokenkegQfeZyiNwAJbNbGZPDyZGkN4iWk5K5qKnzV" },
				{ "encoding": "jsonParsed", "commitment": "processed" }
			]
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_result(token_accounts("1520.75")))
		.create_async()
		.await;

	let balance = transport(&server.url())
		.get_token_balance(OWNER, MINT, Commitment::Processed)
		.await
		.unwrap();

	assert_eq!(balance, Decimal::from_str("1520.75").unwrap());
	mock.assert_async().await;
}

#[tokio::test]
async fn test_send_transaction_returns_signature() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "sendTransaction",
			"params": ["AQIDBA==", { "encoding": "base64" }]
		})))
		.with_status(200)
		.with_body(rpc_result(json!("2id3YC2jK9G5Wo2phDx4gJVAew8DcY5NAojnVuao8rkx")))
		.create_async()
		.await;

	let signature = transport(&server.url())
		.send_transaction("AQIDBA==", Commitment::Confirmed)
		.await
		.unwrap();

	assert_eq!(signature, "2id3YC2jK9G5Wo2phDx4gJVAew8DcY5NAojnVuao8rkx");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_json_rpc_error_is_a_request_error() {
	let mut server = Server::new_async().await;
	let _mock = mock_method(
		&mut server,
		"getBlockHeight",
		200,
		rpc_error(-32005, "Node is behind by 1200 slots"),
	)
	.await;

	let result = transport(&server.url())
		.get_block_height(Commitment::Processed)
		.await;

	match result {
		Err(BlockChainError::RequestError(message)) => {
			assert!(message.contains("-32005"));
			assert!(message.contains("Node is behind"));
		}
		other => panic!("expected RequestError, got {:?}", other),
	}
}

#[tokio::test]
async fn test_http_error_status_is_a_connection_error() {
	let mut server = Server::new_async().await;
	let _mock = mock_method(&mut server, "getBlockHeight", 503, "upstream down".into()).await;

	let result = transport(&server.url())
		.get_block_height(Commitment::Processed)
		.await;

	assert!(matches!(result, Err(BlockChainError::ConnectionError(_))));
}

#[tokio::test]
async fn test_malformed_body_is_a_request_error() {
	let mut server = Server::new_async().await;
	let _mock = mock_method(&mut server, "getBlockHeight", 200, "<html>".into()).await;

	let result = transport(&server.url())
		.get_block_height(Commitment::Processed)
		.await;

	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_connection_error() {
	// Nothing listens on port 9 (discard) in the test environment
	let result = transport("http://127.0.0.1:9")
		.get_block_height(Commitment::Processed)
		.await;

	assert!(matches!(result, Err(BlockChainError::ConnectionError(_))));
}

#[tokio::test]
async fn test_rate_limited_request_is_retried_by_transport() {
	let mut server = Server::new_async().await;
	let limited = server
		.mock("POST", "/")
		.with_status(429)
		.expect(2)
		.create_async()
		.await;

	let retry = HttpRetryConfig {
		max_retries: 1,
		initial_backoff: Duration::from_millis(1),
		max_backoff: Duration::from_millis(2),
		..HttpRetryConfig::default()
	};
	let client =
		SolanaTransportClient::new(&server.url(), Duration::from_secs(2), Some(&retry)).unwrap();

	let result = client.get_block_height(Commitment::Processed).await;

	assert!(matches!(result, Err(BlockChainError::ConnectionError(_))));
	limited.assert_async().await;
}
