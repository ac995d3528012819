//! `subst`: validate override configuration and inspect per-URL overrides.

use std::io::Write as _;

use clap::Parser;

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let output = match &cli.command {
		Command::Check { config, types } => commands::check(config, types.as_deref())?,
		Command::Match { config, urls } => commands::lookup(config, urls)?,
	};

	std::io::stdout().lock().write_all(output.as_bytes())?;
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("subst=debug,subst_overrides=debug,subst_pattern=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
