//! # Parser
//!
//! Turns data file text into a [`DataNode`] tree.
//!
//! ## Line Syntax
//!
//! ```text
//! line    = indent token* comment?
//! indent  = (" " | "\t")*
//! token   = quoted | bare
//! quoted  = '"' [^"]* '"'? | '`' [^`]* '`'?
//! bare    = [^ \t]+
//! comment = "#" .*
//! ```
//!
//! A quoted token missing its closing quote runs to the end of the line.
//! Nesting is decided by comparing indent widths, counting each space or tab
//! as one column.

use std::path::Path;

use crate::error::{DataFileError, Result};
use crate::node::DataNode;


/// A parsed data file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFile {
	root: DataNode,
}

impl DataFile {
	/// Parses data file text. Never fails; malformed lines are tokenized as well as possible.
	pub fn parse(text: &str) -> Self {
		// Open ancestors of the line being read, innermost last. The root has no indent.
		let mut stack: Vec<(Option<usize>, DataNode)> = vec![(None, DataNode::default())];

		for (index, raw) in text.lines().enumerate() {
			let (indent, rest) = split_indent(raw);
			let tokens = tokenize(rest);
			if tokens.is_empty() {
				continue;
			}

			while stack.last().is_some_and(|(open, _)| open.is_some_and(|w| w >= indent)) {
				close_innermost(&mut stack);
			}
			stack.push((Some(indent), DataNode::new(tokens, index + 1)));
		}

		while stack.len() > 1 {
			close_innermost(&mut stack);
		}
		let root = stack.pop().map(|(_, node)| node).unwrap_or_default();
		tracing::trace!(nodes = root.children().len(), "parsed data file");
		Self { root }
	}

	/// Reads and parses the file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| DataFileError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), bytes = text.len(), "loading data file");
		Ok(Self::parse(&text))
	}

	/// Synthetic root node; its children are the top-level lines.
	pub fn root(&self) -> &DataNode {
		&self.root
	}

	pub fn into_root(self) -> DataNode {
		self.root
	}

	/// Top-level nodes in file order.
	pub fn nodes(&self) -> &[DataNode] {
		self.root.children()
	}

	/// First top-level node whose first token is `token`.
	pub fn find(&self, token: &str) -> Option<&DataNode> {
		self.nodes().iter().find(|node| node.token(0) == token)
	}
}

/// Pops the innermost open node and attaches it to its parent.
fn close_innermost(stack: &mut Vec<(Option<usize>, DataNode)>) {
	if let Some((_, node)) = stack.pop()
		&& let Some((_, parent)) = stack.last_mut()
	{
		parent.push_child(node);
	}
}

fn split_indent(line: &str) -> (usize, &str) {
	let rest = line.trim_start_matches([' ', '\t']);
	(line.len() - rest.len(), rest.trim_end_matches('\r'))
}

/// Cursor over the unindented remainder of one line.
struct Tokenizer<'a> {
	input: &'a str,
}

impl<'a> Tokenizer<'a> {
	fn skip_whitespace(&mut self) {
		self.input = self.input.trim_start_matches([' ', '\t']);
	}

	/// Consumes up to (and including) `quote`, returning the text before it.
	fn take_quoted(&mut self, quote: char) -> &'a str {
		match self.input.find(quote) {
			Some(end) => {
				let token = &self.input[..end];
				self.input = &self.input[end + quote.len_utf8()..];
				token
			}
			None => std::mem::take(&mut self.input),
		}
	}

	fn take_bare(&mut self) -> &'a str {
		let end = self.input.find([' ', '\t']).unwrap_or(self.input.len());
		let (token, rest) = self.input.split_at(end);
		self.input = rest;
		token
	}

	fn next_token(&mut self) -> Option<&'a str> {
		self.skip_whitespace();
		let first = self.input.chars().next()?;
		match first {
			'#' => None,
			'"' | '`' => {
				self.input = &self.input[1..];
				Some(self.take_quoted(first))
			}
			_ => Some(self.take_bare()),
		}
	}
}

fn tokenize(line: &str) -> Vec<String> {
	let mut cursor = Tokenizer { input: line };
	std::iter::from_fn(|| cursor.next_token()).map(str::to_owned).collect()
}
