use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "subst")]
#[command(about = "Validate URL-scoped type overrides and inspect what applies where")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Load a settings file and validate every rule
	Check {
		/// Settings file (TOML)
		config: PathBuf,

		/// Known type names (comma-separated); unknown names in rules are rejected
		#[arg(long, value_delimiter = ',')]
		types: Option<Vec<String>>,
	},
	/// Print the overrides active for each URL
	Match {
		/// Settings file (TOML)
		config: PathBuf,

		/// URLs to look up
		#[arg(required = true)]
		urls: Vec<String>,
	},
}
