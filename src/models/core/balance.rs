use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Balance state published by the poller to its consumers
///
/// `value` is the last successfully observed balance. A failed fetch records
/// `error` but never resets `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceState {
	pub value: Decimal,
	pub loading: bool,
	pub error: Option<String>,
	pub last_updated: Option<DateTime<Utc>>,
}

impl Default for BalanceState {
	fn default() -> Self {
		Self {
			value: Decimal::ZERO,
			loading: false,
			error: None,
			last_updated: None,
		}
	}
}
