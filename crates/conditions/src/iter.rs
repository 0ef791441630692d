use std::collections::btree_map;
use std::iter::FusedIterator;

use crate::entry::Entry;

/// Forward iterator over primary entries, skipping derived ones.
///
/// Yields `(key, value)` snapshots. The iterator borrows the store, so no
/// entry can be inserted or erased while it is alive.
///
/// Two iterators compare equal when they stand at the same index position,
/// i.e. when their next primary key is the same or both are exhausted.
#[derive(Clone, Debug)]
pub struct PrimaryIter<'a> {
	rest: btree_map::Range<'a, String, Entry>,
	current: Option<(&'a str, i64)>,
}

impl<'a> PrimaryIter<'a> {
	pub(crate) fn new(rest: btree_map::Range<'a, String, Entry>) -> Self {
		let mut iter = Self { rest, current: None };
		iter.skip_to_primary();
		iter
	}

	pub(crate) fn end() -> Self {
		Self {
			rest: btree_map::Range::default(),
			current: None,
		}
	}

	fn skip_to_primary(&mut self) {
		self.current = self
			.rest
			.find_map(|(key, entry)| entry.inline_value().map(|value| (key.as_str(), value)));
	}

	/// The pair the next call to `next` will yield, without advancing.
	pub fn peek(&self) -> Option<(&'a str, i64)> {
		self.current
	}

	pub fn is_end(&self) -> bool {
		self.current.is_none()
	}
}

impl<'a> Iterator for PrimaryIter<'a> {
	type Item = (&'a str, i64);

	fn next(&mut self) -> Option<Self::Item> {
		let item = self.current?;
		self.skip_to_primary();
		Some(item)
	}
}

impl FusedIterator for PrimaryIter<'_> {}

impl PartialEq for PrimaryIter<'_> {
	fn eq(&self, other: &Self) -> bool {
		self.current.map(|(key, _)| key) == other.current.map(|(key, _)| key)
	}
}

impl Eq for PrimaryIter<'_> {}
