//! Provider ownership.
//!
//! The registry owns every [`Provider`]; index entries refer to them only by
//! [`ProviderId`]. Ids are dense and never reused until [`clear`](ProviderRegistry::clear).

use std::ops::{Index, IndexMut};

use rustc_hash::FxHashMap as HashMap;

use crate::provider::{Provider, ProviderId};

#[derive(Debug, Default)]
pub struct ProviderRegistry {
	providers: Vec<Provider>,
	by_name: HashMap<Box<str>, ProviderId>,
}

impl ProviderRegistry {
	/// Returns the provider registered as `name`, creating it if absent.
	///
	/// An existing provider is returned unchanged, even if it was registered
	/// with a different prefix flag.
	pub fn get_or_insert(&mut self, name: &str, is_prefix: bool) -> ProviderId {
		if let Some(&id) = self.by_name.get(name) {
			return id;
		}
		let id = ProviderId::from_u32(self.providers.len() as u32);
		self.providers.push(Provider::new(name, is_prefix));
		self.by_name.insert(name.into(), id);
		tracing::debug!(provider = name, is_prefix, id = id.as_u32(), "registered condition provider");
		id
	}

	pub fn lookup(&self, name: &str) -> Option<ProviderId> {
		self.by_name.get(name).copied()
	}

	pub fn get(&self, id: ProviderId) -> Option<&Provider> {
		self.providers.get(id.index())
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Provider> {
		self.providers.iter()
	}

	pub fn clear(&mut self) {
		self.providers.clear();
		self.by_name.clear();
	}
}

impl Index<ProviderId> for ProviderRegistry {
	type Output = Provider;

	fn index(&self, id: ProviderId) -> &Provider {
		&self.providers[id.index()]
	}
}

impl IndexMut<ProviderId> for ProviderRegistry {
	fn index_mut(&mut self, id: ProviderId) -> &mut Provider {
		&mut self.providers[id.index()]
	}
}
