//! Runs one CLI command against the conditions block of a data file.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use condstore::ConditionsStore;
use condstore_datafile::{DataFile, DataWriter};

use crate::cli::Command;


/// A data file plus the store loaded from its conditions block.
pub struct Session {
	file: DataFile,
	root: String,
	store: ConditionsStore,
}

impl Session {
	/// Parses `text` and loads the first top-level node named `root`.
	pub fn from_text(text: &str, root: &str) -> Self {
		let file = DataFile::parse(text);
		let store = file.find(root).map(ConditionsStore::from_node).unwrap_or_default();
		tracing::debug!(root, primaries = store.primary_len(), "opened conditions");
		Self {
			file,
			root: root.to_owned(),
			store,
		}
	}

	/// Opens `path`, treating a missing file as empty.
	pub fn open(path: &Path, root: &str) -> anyhow::Result<Self> {
		if !path.exists() {
			tracing::debug!(path = %path.display(), "data file absent; starting empty");
			return Ok(Self::from_text("", root));
		}
		let file = DataFile::load(path).with_context(|| format!("opening {}", path.display()))?;
		let store = file.find(root).map(ConditionsStore::from_node).unwrap_or_default();
		Ok(Self {
			file,
			root: root.to_owned(),
			store,
		})
	}

	pub fn store(&self) -> &ConditionsStore {
		&self.store
	}

	/// Executes `command`, printing any result to `out`.
	pub fn run(&mut self, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
		match command {
			Command::Get { key } => writeln!(out, "{}", self.store.get(key))?,
			Command::Has { key } => writeln!(out, "{}", self.store.has(key))?,
			Command::Set { key, value } => {
				if !self.store.set(key, *value) {
					bail!("write to {key:?} was refused");
				}
			}
			Command::Add { key, delta } => {
				if !self.store.add(key, *delta) {
					bail!("write to {key:?} was refused");
				}
				writeln!(out, "{}", self.store.get(key))?;
			}
			Command::Erase { key } => {
				if !self.store.erase(key) {
					bail!("erase of {key:?} was refused");
				}
			}
			Command::List { from, json } => self.list(from.as_deref(), *json, out)?,
		}
		Ok(())
	}

	fn list(&self, from: Option<&str>, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
		match (from, json) {
			(None, true) => writeln!(out, "{}", serde_json::to_string_pretty(&self.store)?)?,
			(Some(from), true) => {
				let subset: BTreeMap<&str, i64> = self.store.primaries_from(from).collect();
				writeln!(out, "{}", serde_json::to_string_pretty(&subset)?)?;
			}
			(from, false) => {
				let iter = match from {
					Some(from) => self.store.primaries_from(from),
					None => self.store.primaries(),
				};
				for (key, value) in iter {
					writeln!(out, "{key} {value}")?;
				}
			}
		}
		Ok(())
	}

	/// Regenerates the file.
	///
	/// Every other top-level node keeps its position; the first conditions
	/// node is replaced by a fresh save, which is appended if there was none.
	pub fn render(&self) -> anyhow::Result<DataWriter> {
		let mut out = DataWriter::new();
		let mut saved = false;
		for node in self.file.nodes() {
			if !saved && node.token(0) == self.root {
				self.store.save_as(&mut out, &self.root)?;
				saved = true;
			} else {
				out.write_node(node)?;
			}
		}
		if !saved {
			self.store.save_as(&mut out, &self.root)?;
		}
		Ok(out)
	}

	pub fn save(&self, path: &Path) -> anyhow::Result<()> {
		self.render()?.save(path)?;
		Ok(())
	}
}
