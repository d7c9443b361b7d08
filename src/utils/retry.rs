//! Retry policy for remote operations.
//!
//! The policy is immutable: a maximum number of retries and a base delay. The
//! delay after the k-th failed attempt is `base_delay * 2^k`, so a one second
//! base waits 2s, 4s, 8s, ...

use std::time::Duration;

/// Configuration for retry behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Retries after the first attempt; total attempts are `max_retries + 1`
	pub max_retries: u32,

	/// Delay unit that is doubled for every failed attempt
	pub base_delay: Duration,
}

impl Default for RetryPolicy {
	/// Three retries on a one second base
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_delay: Duration::from_secs(1),
		}
	}
}

impl RetryPolicy {
	pub fn new(max_retries: u32, base_delay: Duration) -> Self {
		Self {
			max_retries,
			base_delay,
		}
	}

	/// Same base delay, different retry budget
	pub fn with_max_retries(self, max_retries: u32) -> Self {
		Self {
			max_retries,
			..self
		}
	}

	pub fn total_attempts(&self) -> u32 {
		self.max_retries.saturating_add(1)
	}

	/// Delay to wait after `failed_attempts` attempts have failed (1-based)
	pub fn delay_after(&self, failed_attempts: u32) -> Duration {
		let factor = 1u32.checked_shl(failed_attempts).unwrap_or(u32::MAX);
		self.base_delay.saturating_mul(factor)
	}
}
