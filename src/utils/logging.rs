//! Logging setup for the monitor binary.
//!
//! Events are emitted through `tracing` and formatted by `tracing_subscriber`.
//! The filter comes from `RUST_LOG`; without it the monitor logs its own
//! crate at the requested level and everything else at `warn`, which keeps
//! reqwest/hyper connection chatter out of the output.
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default level for this crate when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_filter(level: &str) -> EnvFilter {
	EnvFilter::new(format!("warn,solana_balance_monitor={}", level))
}

/// Setup logging to stdout
pub fn setup_logging(
	level: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	setup_logging_with_writer(level, std::io::stdout)?;
	Ok(())
}

/// Setup logging with a custom writer
pub fn setup_logging_with_writer<W>(
	level: &str,
	writer: W,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	build_subscriber(level, writer).try_init()?;
	Ok(())
}

fn build_subscriber<W>(level: &str, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

	tracing_subscriber::registry().with(filter).with(
		fmt::layer()
			.with_writer(writer)
			.event_format(
				fmt::format()
					.with_level(true)
					.with_target(true)
					.with_thread_ids(false)
					.with_thread_names(false)
					.with_ansi(true)
					.compact(),
			)
			.fmt_fields(fmt::format::PrettyFields::new()),
	)
}
