//! Serializes node trees back to data file text.

use std::borrow::Cow;
use std::path::Path;

use crate::error::{DataFileError, Result};
use crate::node::DataNode;


/// Accumulates data file text, one line per written node.
///
/// Children are introduced with [`begin_child`](Self::begin_child) and closed
/// with [`end_child`](Self::end_child); each level indents by one tab.
#[derive(Debug, Default)]
pub struct DataWriter {
	out: String,
	depth: usize,
}

impl DataWriter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Writes one line holding `tokens`, quoting each as needed.
	///
	/// Nothing is written if any token is unwritable.
	pub fn write_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
		let quoted = tokens
			.iter()
			.map(|token| {
				let token = token.as_ref();
				quote(token).ok_or_else(|| DataFileError::Unwritable { token: token.to_owned() })
			})
			.collect::<Result<Vec<_>>>()?;

		for _ in 0..self.depth {
			self.out.push('\t');
		}
		for (i, token) in quoted.iter().enumerate() {
			if i > 0 {
				self.out.push(' ');
			}
			self.out.push_str(token);
		}
		self.out.push('\n');
		Ok(())
	}

	pub fn write_key(&mut self, key: &str) -> Result<()> {
		self.write_tokens(&[key])
	}

	pub fn write_key_value(&mut self, key: &str, value: i64) -> Result<()> {
		self.write_tokens(&[key, value.to_string().as_str()])
	}

	pub fn begin_child(&mut self) {
		self.depth += 1;
	}

	pub fn end_child(&mut self) {
		self.depth = self.depth.saturating_sub(1);
	}

	/// Writes `node` and all of its descendants at the current depth.
	pub fn write_node(&mut self, node: &DataNode) -> Result<()> {
		self.write_tokens(node.tokens())?;
		if node.has_children() {
			self.begin_child();
			let written = node.children().iter().try_for_each(|child| self.write_node(child));
			self.end_child();
			written?;
		}
		Ok(())
	}

	pub fn as_str(&self) -> &str {
		&self.out
	}

	pub fn into_string(self) -> String {
		self.out
	}

	/// Writes the accumulated text to `path`, replacing any existing file.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		std::fs::write(path, &self.out).map_err(|source| DataFileError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), bytes = self.out.len(), "saved data file");
		Ok(())
	}
}

/// Quotes `token` so that the parser reads it back unchanged.
///
/// Tokens containing `"` use backticks. Tokens that are empty, contain
/// whitespace, or would start a comment use double quotes. A token holding
/// both quote characters is only writable bare. Returns `None` for tokens
/// that cannot round-trip, including any with a line break.
pub fn quote(token: &str) -> Option<Cow<'_, str>> {
	if token.contains('\n') {
		return None;
	}
	let needs_quotes = token.is_empty()
		|| token.starts_with(['#', '"', '`'])
		|| token.contains([' ', '\t', '\r']);
	match (token.contains('"'), token.contains('`')) {
		(true, true) if needs_quotes => None,
		(true, true) => Some(Cow::Borrowed(token)),
		(true, false) => Some(Cow::Owned(format!("`{token}`"))),
		(false, _) if needs_quotes => Some(Cow::Owned(format!("\"{token}\""))),
		(false, _) => Some(Cow::Borrowed(token)),
	}
}

/// Whether [`quote`] can preserve `token`.
pub fn is_writable(token: &str) -> bool {
	quote(token).is_some()
}
