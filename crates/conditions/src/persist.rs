//! Loading from and saving to data file nodes.
//!
//! Saved form:
//!
//! ```text
//! conditions
//! 	"visited Earth"
//! 	"credits earned" 1500
//! ```
//!
//! A bare key means `1`. Only primary entries are written, and entries
//! holding `0` are left out, so a stored zero reloads as an absent key.
//! Keys the data file format cannot hold are skipped with a warning.

use condstore_datafile::{DataNode, DataWriter, is_writable};

use crate::store::ConditionsStore;

/// Token heading the saved condition block.
pub const CONDITIONS_NODE: &str = "conditions";

impl ConditionsStore {
	/// Builds a store from the children of `node`.
	pub fn from_node(node: &DataNode) -> Self {
		let mut store = Self::new();
		store.load(node);
		store
	}

	/// Applies `set(key, value)` for every child of `node`, in order.
	///
	/// A child without a value token sets `1`. Later duplicates overwrite
	/// earlier ones, and keys answered by a provider are written through it.
	pub fn load(&mut self, node: &DataNode) {
		for child in node.children() {
			let value = if child.size() >= 2 { persisted_value(child) } else { 1 };
			self.set(child.token(0), value);
		}
		tracing::debug!(line = node.line(), children = node.children().len(), "loaded conditions");
	}

	/// Writes the primary entries under a [`CONDITIONS_NODE`] block.
	pub fn save(&self, out: &mut DataWriter) -> condstore_datafile::Result<()> {
		self.save_as(out, CONDITIONS_NODE)
	}

	/// Like [`save`](Self::save), under a block named `root`.
	///
	/// Nothing is written when there are no primary entries. A store whose
	/// primaries are all zero writes an empty block. Fails only when `root`
	/// itself is unwritable.
	pub fn save_as(&self, out: &mut DataWriter, root: &str) -> condstore_datafile::Result<()> {
		let mut primaries = self.primaries().peekable();
		if primaries.peek().is_none() {
			return Ok(());
		}

		out.write_key(root)?;
		out.begin_child();
		let mut written = 0usize;
		for (key, value) in primaries.filter(|&(_, value)| value != 0) {
			if !is_writable(key) {
				tracing::warn!(key, value, "condition key cannot be saved; skipping");
				continue;
			}
			match value {
				1 => out.write_key(key)?,
				_ => out.write_key_value(key, value)?,
			}
			written += 1;
		}
		out.end_child();
		tracing::debug!(root, written, "saved conditions");
		Ok(())
	}
}

/// Integer tokens are taken exactly; other numbers are truncated toward zero.
fn persisted_value(node: &DataNode) -> i64 {
	node.token(1).parse().unwrap_or_else(|_| node.value(1) as i64)
}
