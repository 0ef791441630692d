//! CLI schema for the condstore binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};


#[derive(Parser, Debug)]
#[command(name = "condstore")]
#[command(about = "Inspect and edit the conditions block of a data file")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (TOML)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Data file holding the conditions block (created on first write)
	pub file: PathBuf,

	/// Operation to perform.
	#[command(subcommand)]
	pub command: Command,
}

/// Available operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Print the value of a condition (0 if unset)
	Get { key: String },
	/// Print whether a condition is set
	Has { key: String },
	/// Set a condition
	Set {
		key: String,
		#[arg(allow_negative_numbers = true)]
		value: i64,
	},
	/// Add to a condition and print the result
	Add {
		key: String,
		#[arg(allow_negative_numbers = true)]
		delta: i64,
	},
	/// Erase a condition
	Erase { key: String },
	/// List stored conditions in key order
	List {
		/// Start at the first key at or after this one
		#[arg(long, value_name = "KEY")]
		from: Option<String>,

		/// Print a JSON object instead of one line per condition
		#[arg(long)]
		json: bool,
	},
}

impl Command {
	/// Whether the data file must be rewritten after running.
	pub fn is_mutating(&self) -> bool {
		matches!(self, Self::Set { .. } | Self::Add { .. } | Self::Erase { .. })
	}
}
