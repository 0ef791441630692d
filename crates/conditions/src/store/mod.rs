//! The condition store.
//!
//! [`ConditionsStore`] keeps one sorted index from key to [`Entry`] and a
//! separate [`ProviderRegistry`]. Lookups resolve a name in one ordered
//! search:
//!
//! 1. Take the greatest index key `<=` the name.
//! 2. An exact match is the entry.
//! 3. Otherwise the candidate matches only if its entry is delegated to a
//!    prefix provider whose name the queried name starts with.
//!
//! A prefix provider's own entry sorts before every key it covers, so the
//! nearest predecessor is the only candidate worth checking. A longer exact
//! entry sitting between the prefix and the queried name shadows the prefix.
//!
//! # Auto-vivification
//!
//! [`set`](ConditionsStore::set) creates an inline entry for an unresolved
//! name. [`entry`](ConditionsStore::entry) always materializes an entry at the
//! exact name, copying the covering prefix provider if there is one. The
//! read operations never change the index.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::entry::{Entry, EntryMut};
use crate::error::Result;
use crate::iter::PrimaryIter;
use crate::provider::{Provider, ProviderId};
use crate::registry::ProviderRegistry;

#[cfg(test)]
mod tests;

/// Hybrid store of primary (stored) and derived (provider-computed) integer conditions.
///
/// Not internally synchronized. Provider callbacks run synchronously inside
/// the calling operation.
#[derive(Debug, Default)]
pub struct ConditionsStore {
	index: BTreeMap<String, Entry>,
	providers: ProviderRegistry,
}

impl ConditionsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Value of `name`; `0` if nothing resolves.
	pub fn get(&self, name: &str) -> i64 {
		neutral(name, self.try_get(name), 0)
	}

	pub fn try_get(&self, name: &str) -> Result<i64> {
		match self.resolve(name) {
			None => Ok(0),
			Some((_, Entry::Inline(value))) => Ok(*value),
			Some((_, Entry::Delegated { provider, .. })) => self.providers[*provider].get(name),
		}
	}

	/// Whether `name` is set. Inline entries are always set.
	pub fn has(&self, name: &str) -> bool {
		neutral(name, self.try_has(name), false)
	}

	pub fn try_has(&self, name: &str) -> Result<bool> {
		match self.resolve(name) {
			None => Ok(false),
			Some((_, Entry::Inline(_))) => Ok(true),
			Some((_, Entry::Delegated { provider, .. })) => self.providers[*provider].has(name),
		}
	}

	/// Existence and value in one resolution. The value is `0` when absent.
	pub fn has_get(&self, name: &str) -> (bool, i64) {
		neutral(name, self.try_has_get(name), (false, 0))
	}

	pub fn try_has_get(&self, name: &str) -> Result<(bool, i64)> {
		match self.resolve(name) {
			None => Ok((false, 0)),
			Some((_, Entry::Inline(value))) => Ok((true, *value)),
			Some((_, Entry::Delegated { provider, .. })) => {
				let provider = &self.providers[*provider];
				if provider.has(name)? {
					Ok((true, provider.get(name)?))
				} else {
					Ok((false, 0))
				}
			}
		}
	}

	/// Adds `delta` to `name`. Equivalent to `set(name, get(name) + delta)`.
	pub fn add(&mut self, name: &str, delta: i64) -> bool {
		neutral(name, self.try_add(name, delta), false)
	}

	pub fn try_add(&mut self, name: &str, delta: i64) -> Result<bool> {
		// Resolves twice, once for the read and once for the write.
		let current = self.try_get(name)?;
		self.try_set(name, current.wrapping_add(delta))
	}

	/// Sets `name`, creating an inline entry if nothing resolves.
	///
	/// Returns the provider's verdict for derived names; primary writes
	/// always succeed.
	pub fn set(&mut self, name: &str, value: i64) -> bool {
		neutral(name, self.try_set(name, value), false)
	}

	pub fn try_set(&mut self, name: &str, value: i64) -> Result<bool> {
		match self.resolve(name).map(|(_, entry)| entry.provider()) {
			None => {
				self.index.insert(name.to_owned(), Entry::Inline(value));
				Ok(true)
			}
			Some(None) => {
				if let Some(entry) = self.index.get_mut(name) {
					*entry = Entry::Inline(value);
				}
				Ok(true)
			}
			Some(Some(id)) => self.providers[id].set(name, value),
		}
	}

	/// Erases `name`. Erasing something absent succeeds.
	pub fn erase(&mut self, name: &str) -> bool {
		neutral(name, self.try_erase(name), false)
	}

	pub fn try_erase(&mut self, name: &str) -> Result<bool> {
		match self.resolve(name).map(|(_, entry)| entry.provider()) {
			None => Ok(true),
			Some(None) => {
				self.index.remove(name);
				Ok(true)
			}
			Some(Some(id)) => self.providers[id].erase(name),
		}
	}

	/// Live handle to the entry at exactly `name`, materializing it if needed.
	///
	/// An existing entry wins. Otherwise a covering prefix provider yields a
	/// new delegated entry for `name`, and anything else yields a new inline
	/// zero. This is the only operation that grows the index for an unseen key
	/// under a known prefix.
	pub fn entry<'a>(&'a mut self, name: &'a str) -> EntryMut<'a> {
		let fresh = match self.resolve(name) {
			Some((key, Entry::Delegated { provider, .. })) if key != name => Entry::Delegated {
				provider: *provider,
				key: Some(name.into()),
			},
			_ => Entry::default(),
		};
		EntryMut {
			key: name,
			entry: self.index.entry(name.to_owned()).or_insert(fresh),
			providers: &self.providers,
		}
	}

	/// The entry `name` resolves to, without materializing anything.
	pub fn lookup(&self, name: &str) -> Option<&Entry> {
		self.resolve(name).map(|(_, entry)| entry)
	}

	/// Returns the exact-key provider `name`, creating it if absent, and points
	/// the index entry at `name` to it.
	pub fn provider_named(&mut self, name: &str) -> &mut Provider {
		self.register(name, false)
	}

	/// Returns the prefix provider `prefix`, creating it if absent, and points
	/// the index entry at `prefix` to it.
	///
	/// Every key starting with `prefix` then resolves to this provider unless
	/// a closer entry exists for it.
	pub fn provider_prefixed(&mut self, prefix: &str) -> &mut Provider {
		self.register(prefix, true)
	}

	fn register(&mut self, name: &str, is_prefix: bool) -> &mut Provider {
		let id = self.providers.get_or_insert(name, is_prefix);
		self.index.insert(
			name.to_owned(),
			Entry::Delegated {
				provider: id,
				key: None,
			},
		);
		&mut self.providers[id]
	}

	pub fn provider(&self, id: ProviderId) -> Option<&Provider> {
		self.providers.get(id)
	}

	pub fn providers(&self) -> &ProviderRegistry {
		&self.providers
	}

	/// Removes every entry and every provider.
	pub fn clear(&mut self) {
		tracing::debug!(entries = self.index.len(), providers = self.providers.len(), "clearing conditions");
		self.index.clear();
		self.providers.clear();
	}

	/// Number of index entries, primary and derived.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Primary entries in key order.
	pub fn primaries(&self) -> PrimaryIter<'_> {
		PrimaryIter::new(self.index.range::<str, _>(..))
	}

	/// Primary entries with keys `>= key`, in key order.
	pub fn primaries_from(&self, key: &str) -> PrimaryIter<'_> {
		PrimaryIter::new(self.index.range::<str, _>((Bound::Included(key), Bound::Unbounded)))
	}

	/// The exhausted iterator, equal to every other exhausted iterator.
	pub fn primaries_end(&self) -> PrimaryIter<'_> {
		PrimaryIter::end()
	}

	pub fn primary_len(&self) -> usize {
		self.primaries().count()
	}

	fn resolve(&self, name: &str) -> Option<(&str, &Entry)> {
		let at_or_before = (Bound::Unbounded, Bound::Included(name));
		let Some((key, entry)) = self.index.range::<str, _>(at_or_before).next_back() else {
			tracing::trace!(key = name, "no entry at or before key");
			return None;
		};
		let key = key.as_str();
		if key == name {
			return Some((key, entry));
		}
		if let Entry::Delegated { provider, .. } = entry
			&& self.providers[*provider].covers(name)
		{
			tracing::trace!(key = name, prefix = %key, "resolved through prefix provider");
			return Some((key, entry));
		}
		tracing::trace!(key = name, nearest = %key, "unresolved");
		None
	}
}

impl<K: AsRef<str>> Extend<(K, i64)> for ConditionsStore {
	/// Applies [`set`](Self::set) to each pair in order; later duplicates win.
	fn extend<I: IntoIterator<Item = (K, i64)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.set(key.as_ref(), value);
		}
	}
}

impl<K: AsRef<str>> FromIterator<(K, i64)> for ConditionsStore {
	fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
		let mut store = Self::new();
		store.extend(iter);
		store
	}
}

impl From<BTreeMap<String, i64>> for ConditionsStore {
	fn from(values: BTreeMap<String, i64>) -> Self {
		values.into_iter().collect()
	}
}

/// Unwraps a fallible store result, logging and substituting `fallback` when
/// a provider was exercised through an unwired callback.
pub(crate) fn neutral<T>(key: &str, result: Result<T>, fallback: T) -> T {
	result.unwrap_or_else(|error| {
		tracing::warn!(key, %error, "condition provider incomplete");
		fallback
	})
}
