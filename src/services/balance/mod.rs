//! Balance polling service.
//!
//! Keeps one always-current balance for a consumer: refreshed on a fixed
//! interval and on demand, never more than one fetch at a time, and no state
//! writes once the consumer has detached.

mod poller;

pub use poller::{BalancePoller, FetchOutcome, PollerHandle, FETCH_ERROR_MESSAGE};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::services::blockchain::BlockChainError;

/// Source of the balance the poller publishes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceSource: Send + Sync + 'static {
	async fn fetch_balance(&self) -> Result<Decimal, BlockChainError>;
}
