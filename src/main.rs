//! Solana balance monitor entry point.
//!
//! Loads the monitor configuration, builds the RPC endpoint pool and runs one
//! of the subcommands:
//! - `watch`: attach a balance poller and log every published change until Ctrl+C
//! - `balance`: query the balance once
//! - `endpoints`: probe every configured endpoint and report its health
//! - `send`: submit a signed, base64 encoded transaction

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{future::Future, path::PathBuf};
use tokio::sync::watch;
use tracing::{error, info, instrument};

use solana_balance_monitor::{
	bootstrap::{load_config, AppContext},
	models::BalanceState,
	utils::logging::{setup_logging, DEFAULT_LOG_LEVEL},
};

#[derive(Debug, Parser)]
#[command(
	name = "solana-balance-monitor",
	version,
	about = "Watches an SPL token balance through a failover pool of Solana RPC endpoints"
)]
struct Cli {
	/// Path to the monitor configuration (JSON)
	#[arg(long, short, global = true)]
	config: Option<PathBuf>,

	/// Log level for this crate when RUST_LOG is not set
	#[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Poll the balance and log every change until interrupted
	Watch,
	/// Query the balance once
	Balance,
	/// Probe every endpoint and print its health
	Endpoints,
	/// Submit a signed transaction
	Send {
		/// Base64 encoded, signed transaction
		#[arg(long)]
		payload: String,
	},
}

/// Logs every published state until the channel closes or `shutdown` resolves
///
/// Returns the number of states logged.
async fn follow_updates<F>(mut updates: watch::Receiver<BalanceState>, shutdown: F) -> usize
where
	F: Future,
{
	tokio::pin!(shutdown);
	let mut logged = 0;

	loop {
		tokio::select! {
			changed = updates.changed() => {
				if changed.is_err() {
					break;
				}
				let state = updates.borrow_and_update().clone();
				match &state.error {
					Some(message) => error!(
						value = %state.value,
						%message,
						"Balance refresh failed, showing last known value"
					),
					None if state.loading => info!("Loading balance"),
					None => info!(value = %state.value, updated = ?state.last_updated, "Balance"),
				}
				logged += 1;
			}
			_ = &mut shutdown => {
				info!("Shutdown signal received");
				break;
			}
		}
	}

	logged
}

#[instrument(skip_all)]
async fn watch(context: &AppContext) -> anyhow::Result<()> {
	let poller = context.start_balance_poller().await?;
	follow_updates(poller.subscribe(), tokio::signal::ctrl_c()).await;
	poller.stop();
	Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenv().ok();
	let cli = Cli::parse();

	setup_logging(&cli.log_level)
		.map_err(|e| anyhow::anyhow!("Failed to setup logging: {}", e))?;

	let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
	let context = AppContext::new(config);

	match cli.command {
		Command::Watch => watch(&context).await?,
		Command::Balance => {
			let balance = context.client().await?.get_balance().await?;
			println!("{}", balance);
		}
		Command::Endpoints => {
			let pool = context.pool().await?;
			for status in pool.probe_all().await {
				println!(
					"{}\t{}{}",
					status.url,
					if status.healthy { "healthy" } else { "unhealthy" },
					if status.current { "\t(current)" } else { "" }
				);
			}
		}
		Command::Send { payload } => {
			let signature = context.client().await?.send_transaction(&payload).await?;
			println!("{}", signature);
		}
	}

	Ok(())
}
