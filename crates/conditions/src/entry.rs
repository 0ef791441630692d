//! Index entries and the live entry handle.

use crate::error::Result;
use crate::provider::ProviderId;
use crate::registry::ProviderRegistry;

/// A single logical value in the store index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Entry {
	/// Primary value, stored directly.
	Inline(i64),
	/// Derived value answered by a provider.
	///
	/// `key` is the exact key passed to the provider; `None` means the
	/// provider's own registered name.
	Delegated { provider: ProviderId, key: Option<Box<str>> },
}

impl Default for Entry {
	fn default() -> Self {
		Self::Inline(0)
	}
}

impl Entry {
	pub fn is_derived(&self) -> bool {
		matches!(self, Self::Delegated { .. })
	}

	pub fn inline_value(&self) -> Option<i64> {
		match *self {
			Self::Inline(value) => Some(value),
			Self::Delegated { .. } => None,
		}
	}

	pub fn provider(&self) -> Option<ProviderId> {
		match *self {
			Self::Inline(_) => None,
			Self::Delegated { provider, .. } => Some(provider),
		}
	}

	pub(crate) fn read(&self, providers: &ProviderRegistry) -> Result<i64> {
		match self {
			Self::Inline(value) => Ok(*value),
			Self::Delegated { provider, key } => {
				let provider = &providers[*provider];
				provider.get(key.as_deref().unwrap_or(provider.name()))
			}
		}
	}

	/// Applies `op` to the current value. Delegated entries go through the
	/// provider's get then set; inline entries always succeed.
	pub(crate) fn update(&mut self, providers: &ProviderRegistry, op: impl FnOnce(i64) -> i64) -> Result<bool> {
		match self {
			Self::Inline(value) => {
				*value = op(*value);
				Ok(true)
			}
			Self::Delegated { provider, key } => {
				let provider = &providers[*provider];
				provider.update(key.as_deref().unwrap_or(provider.name()), op)
			}
		}
	}
}

/// Live handle to one index entry, returned by
/// [`ConditionsStore::entry`](crate::ConditionsStore::entry).
///
/// Every mutation is a read-modify-write through the provider when the entry
/// is derived, so the provider stays the single source of truth. The `bool`
/// results report whether the provider accepted the write; inline entries
/// always accept.
pub struct EntryMut<'a> {
	pub(crate) key: &'a str,
	pub(crate) entry: &'a mut Entry,
	pub(crate) providers: &'a ProviderRegistry,
}

impl EntryMut<'_> {
	pub fn key(&self) -> &str {
		self.key
	}

	pub fn is_derived(&self) -> bool {
		self.entry.is_derived()
	}

	pub fn try_value(&self) -> Result<i64> {
		self.entry.read(self.providers)
	}

	/// Current value; `0` if a derived entry's provider cannot answer.
	pub fn value(&self) -> i64 {
		crate::store::neutral(self.key, self.try_value(), 0)
	}

	pub fn try_update(&mut self, op: impl FnOnce(i64) -> i64) -> Result<bool> {
		self.entry.update(self.providers, op)
	}

	pub fn assign(&mut self, value: i64) -> bool {
		match &mut *self.entry {
			Entry::Inline(v) => {
				*v = value;
				true
			}
			Entry::Delegated { provider, key } => {
				let provider = &self.providers[*provider];
				let result = provider.set(key.as_deref().unwrap_or(provider.name()), value);
				crate::store::neutral(self.key, result, false)
			}
		}
	}

	pub fn increment(&mut self) -> bool {
		self.add(1)
	}

	pub fn decrement(&mut self) -> bool {
		self.sub(1)
	}

	pub fn add(&mut self, delta: i64) -> bool {
		let result = self.try_update(|v| v.wrapping_add(delta));
		crate::store::neutral(self.key, result, false)
	}

	pub fn sub(&mut self, delta: i64) -> bool {
		let result = self.try_update(|v| v.wrapping_sub(delta));
		crate::store::neutral(self.key, result, false)
	}
}
