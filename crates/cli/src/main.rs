//! condstore binary.
//!
//! Loads the conditions block of a data file, runs one command against it,
//! and writes the file back when the command mutates the store.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::Cli;
use commands::Session;
use config::Config;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "CONDSTORE_LOG";

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let config = match &cli.config {
		Some(path) => Config::load(path)?,
		None => Config::default(),
	};
	init_tracing(&config, cli.verbose);

	let mut session = Session::open(&cli.file, &config.root)?;
	tracing::debug!(file = %cli.file.display(), primaries = session.store().primary_len(), "loaded");
	session.run(&cli.command, &mut std::io::stdout().lock())?;

	if cli.command.is_mutating() {
		session.save(&cli.file)?;
		tracing::info!(file = %cli.file.display(), "saved");
	}
	Ok(())
}

fn init_tracing(config: &Config, verbose: bool) {
	let default = if verbose { "debug" } else { config.log.as_str() };
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
