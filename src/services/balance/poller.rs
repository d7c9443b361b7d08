//! Periodic balance poller.
//!
//! `BalancePoller::start` attaches a poller: one fetch right away, then one
//! per interval. The returned `PollerHandle` is the consumer side: read or
//! subscribe to the published `BalanceState`, request a refetch, or stop.
//!
//! A single `in_flight` flag (compare-and-swap) guarantees at most one fetch
//! at a time; timer ticks and refetches that find it set are dropped, not
//! queued. State writes and the detach flag are both taken under the watch
//! channel's write lock, so a fetch that resolves after `stop` never lands.

use chrono::Utc;
use std::{
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::Duration,
};
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{interval_at, Instant, MissedTickBehavior},
};

use crate::{models::BalanceState, services::balance::BalanceSource};

/// Error shown to consumers when a fetch fails
pub const FETCH_ERROR_MESSAGE: &str = "Unable to fetch balance";

/// Result of a single fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
	/// The fetch succeeded and the new value was published
	Updated,
	/// The fetch failed; the error was published and the last value kept
	Failed,
	/// Nothing was fetched: another fetch was in flight or the poller is detached
	Skipped,
	/// The fetch completed after the poller was detached and its result was dropped
	Discarded,
}

/// Clears the in-flight flag on every exit path
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
	fn acquire(flag: &'a AtomicBool) -> Option<Self> {
		flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.ok()
			.map(|_| Self(flag))
	}
}

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

struct PollerShared<S> {
	source: Arc<S>,
	state: watch::Sender<BalanceState>,
	in_flight: AtomicBool,
	detached: AtomicBool,
	/// Set once the first fetch since attach has completed
	settled: AtomicBool,
}

impl<S: BalanceSource> PollerShared<S> {
	async fn fetch_once(&self) -> FetchOutcome {
		if self.detached.load(Ordering::Acquire) {
			return FetchOutcome::Skipped;
		}

		let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
			tracing::debug!("Balance fetch already in flight, skipping");
			return FetchOutcome::Skipped;
		};

		// Only the first fetch shows as loading; later refreshes are silent
		if !self.settled.load(Ordering::Acquire) {
			self.state.send_if_modified(|state| {
				if self.detached.load(Ordering::Acquire) || state.loading {
					return false;
				}
				state.loading = true;
				true
			});
		}

		let result = self.source.fetch_balance().await;

		let mut outcome = FetchOutcome::Discarded;
		self.state.send_if_modified(|state| {
			if self.detached.load(Ordering::Acquire) {
				return false;
			}
			match result {
				Ok(value) => {
					tracing::debug!(%value, "Balance updated");
					state.value = value;
					state.error = None;
					state.last_updated = Some(Utc::now());
					outcome = FetchOutcome::Updated;
				}
				Err(e) => {
					tracing::warn!(error = %e, stale_value = %state.value, "Balance fetch failed");
					state.error = Some(FETCH_ERROR_MESSAGE.to_string());
					outcome = FetchOutcome::Failed;
				}
			}
			state.loading = false;
			true
		});

		if outcome != FetchOutcome::Discarded {
			self.settled.store(true, Ordering::Release);
		} else {
			tracing::debug!("Balance fetch completed after detach, result discarded");
		}
		outcome
	}

	fn detach(&self) -> bool {
		let mut newly_detached = false;
		self.state.send_if_modified(|_| {
			newly_detached = !self.detached.swap(true, Ordering::AcqRel);
			false
		});
		newly_detached
	}
}

/// Poller configuration; `start` attaches it
pub struct BalancePoller<S> {
	source: Arc<S>,
	interval: Duration,
}

impl<S: BalanceSource> BalancePoller<S> {
	pub fn new(source: Arc<S>, interval: Duration) -> Self {
		Self { source, interval }
	}

	/// Attaches the poller
	///
	/// Triggers one fetch immediately and then one every `interval`. Ticks that
	/// find a fetch in flight are skipped. Must be called inside a tokio runtime.
	pub fn start(self) -> PollerHandle<S> {
		let shared = Arc::new(PollerShared {
			source: self.source,
			state: watch::Sender::new(BalanceState {
				loading: true,
				..BalanceState::default()
			}),
			in_flight: AtomicBool::new(false),
			detached: AtomicBool::new(false),
			settled: AtomicBool::new(false),
		});

		tracing::info!(interval = ?self.interval, "Balance poller attached");

		let initial = shared.clone();
		tokio::spawn(async move {
			initial.fetch_once().await;
		});

		let ticker = tokio::spawn(run_timer(shared.clone(), self.interval));

		PollerHandle { shared, ticker }
	}
}

async fn run_timer<S: BalanceSource>(shared: Arc<PollerShared<S>>, period: Duration) {
	let mut ticker = interval_at(Instant::now() + period, period);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

	loop {
		ticker.tick().await;
		if shared.detached.load(Ordering::Acquire) {
			break;
		}
		if shared.in_flight.load(Ordering::Acquire) {
			tracing::debug!("Balance fetch still in flight, skipping tick");
			continue;
		}
		let fetch = shared.clone();
		tokio::spawn(async move {
			fetch.fetch_once().await;
		});
	}
}

/// Consumer side of an attached poller; dropping it detaches the poller
pub struct PollerHandle<S: BalanceSource> {
	shared: Arc<PollerShared<S>>,
	ticker: JoinHandle<()>,
}

impl<S: BalanceSource> PollerHandle<S> {
	/// Snapshot of the published state
	pub fn state(&self) -> BalanceState {
		self.shared.state.borrow().clone()
	}

	/// Receiver that is notified on every published change
	pub fn subscribe(&self) -> watch::Receiver<BalanceState> {
		self.shared.state.subscribe()
	}

	/// Fetches now unless a fetch is already in flight
	pub async fn refetch(&self) -> FetchOutcome {
		self.shared.fetch_once().await
	}

	pub fn is_detached(&self) -> bool {
		self.shared.detached.load(Ordering::Acquire)
	}

	/// Detaches the poller
	///
	/// Stops the timer at once. A fetch already in flight runs to completion but
	/// its result is dropped. Calling `stop` again is a no-op.
	pub fn stop(&self) {
		if self.shared.detach() {
			self.ticker.abort();
			tracing::info!("Balance poller detached");
		}
	}
}

impl<S: BalanceSource> Drop for PollerHandle<S> {
	fn drop(&mut self) {
		self.stop();
	}
}
