//! Data file nodes.

/// One line of a data file plus the lines nested beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataNode {
	tokens: Vec<String>,
	children: Vec<DataNode>,
	line: usize,
}

impl DataNode {
	/// Creates a node from its tokens, as if read from `line` (1-based).
	pub fn new<I, S>(tokens: I, line: usize) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			tokens: tokens.into_iter().map(Into::into).collect(),
			children: Vec::new(),
			line,
		}
	}

	/// Appends a child node.
	pub fn push_child(&mut self, child: DataNode) {
		self.children.push(child);
	}

	/// Number of tokens on this node's line.
	pub fn size(&self) -> usize {
		self.tokens.len()
	}

	/// Returns token `index`, or `""` if the line has fewer tokens.
	pub fn token(&self, index: usize) -> &str {
		self.tokens.get(index).map_or("", String::as_str)
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn children(&self) -> &[DataNode] {
		&self.children
	}

	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	/// Source line the node was read from (1-based; 0 for synthetic nodes).
	pub fn line(&self) -> usize {
		self.line
	}

	/// Returns `true` if token `index` exists and is a number.
	pub fn is_number(&self, index: usize) -> bool {
		self.tokens.get(index).is_some_and(|t| is_number(t))
	}

	/// Numeric value of token `index`.
	///
	/// A missing or non-numeric token yields `0.0` and logs a warning naming
	/// the offending line.
	pub fn value(&self, index: usize) -> f64 {
		let Some(token) = self.tokens.get(index) else {
			tracing::warn!(line = self.line, index, "missing numeric token");
			return 0.0;
		};
		if !is_number(token) {
			tracing::warn!(line = self.line, index, token = %token, "expected a number");
			return 0.0;
		}
		token.parse().unwrap_or(0.0)
	}
}

/// Accepts `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
///
/// Rejects the `inf`/`nan` spellings `f64::from_str` would otherwise allow.
pub fn is_number(token: &str) -> bool {
	let bytes = token.as_bytes();
	let mut pos = 0;
	if matches!(bytes.first(), Some(b'+' | b'-')) {
		pos += 1;
	}

	let mut mantissa_digits = 0;
	let mut seen_dot = false;
	while let Some(&b) = bytes.get(pos) {
		match b {
			b'0'..=b'9' => mantissa_digits += 1,
			b'.' if !seen_dot => seen_dot = true,
			_ => break,
		}
		pos += 1;
	}
	if mantissa_digits == 0 {
		return false;
	}

	if matches!(bytes.get(pos), Some(b'e' | b'E')) {
		pos += 1;
		if matches!(bytes.get(pos), Some(b'+' | b'-')) {
			pos += 1;
		}
		let exp_start = pos;
		while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
			pos += 1;
		}
		if pos == exp_start {
			return false;
		}
	}

	pos == bytes.len()
}
