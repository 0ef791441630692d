//! TOML configuration for the condstore binary.

use std::path::Path;

use anyhow::Context;
use condstore::CONDITIONS_NODE;
use serde::Deserialize;


/// Log filter applied when neither `CONDSTORE_LOG` nor `--verbose` is given.
pub const DEFAULT_LOG: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// First token of the top-level node holding the conditions.
	pub root: String,
	/// Default log filter directive.
	pub log: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			root: CONDITIONS_NODE.to_string(),
			log: DEFAULT_LOG.to_string(),
		}
	}
}

impl Config {
	pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("reading config {}", path.display()))?;
		Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
	}
}
