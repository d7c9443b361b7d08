#![no_main]

use libfuzzer_sys::fuzz_target;
use solana_balance_monitor::services::blockchain::{
	parse_block_height, parse_signature, parse_token_balance,
};

const MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

fuzz_target!(|data: &[u8]| {
	if let Ok(result) = serde_json::from_slice::<serde_json::Value>(data) {
		// Parsers must reject malformed results without panicking
		let _ = parse_token_balance(&result, MINT);
		let _ = parse_block_height(&result);
		let _ = parse_signature(&result);
	}
});
