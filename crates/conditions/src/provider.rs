//! Derived-value providers.
//!
//! A [`Provider`] answers reads and writes for keys it does not store. It is
//! created by name through the store's registration methods and then wired
//! with its callbacks by whichever subsystem owns that namespace:
//!
//! ```ignore
//! let kills = Rc::new(Cell::new(0));
//! let k = kills.clone();
//! store
//! 	.provider_named("pirates killed")
//! 	.on_get(move |_| k.get())
//! 	.on_has(|_| true)
//! 	.on_set(|_, _| false)
//! 	.on_erase(|_| false);
//! ```

use std::fmt;

use crate::error::{CallbackSlot, ConditionError, Result};

pub type GetFn = Box<dyn Fn(&str) -> i64>;
pub type HasFn = Box<dyn Fn(&str) -> bool>;
pub type SetFn = Box<dyn Fn(&str, i64) -> bool>;
pub type EraseFn = Box<dyn Fn(&str) -> bool>;

/// Stable handle to a provider owned by a store's registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProviderId(u32);

impl ProviderId {
	pub(crate) const fn from_u32(raw: u32) -> Self {
		Self(raw)
	}

	pub const fn as_u32(self) -> u32 {
		self.0
	}

	pub(crate) const fn index(self) -> usize {
		self.0 as usize
	}
}

/// A named bundle of get/has/set/erase callbacks, scoped to one exact key or
/// to every key beginning with its name.
pub struct Provider {
	name: Box<str>,
	is_prefix: bool,
	get: Option<GetFn>,
	has: Option<HasFn>,
	set: Option<SetFn>,
	erase: Option<EraseFn>,
}

impl Provider {
	pub(crate) fn new(name: &str, is_prefix: bool) -> Self {
		Self {
			name: name.into(),
			is_prefix,
			get: None,
			has: None,
			set: None,
			erase: None,
		}
	}

	/// Registered exact key or prefix.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_prefix(&self) -> bool {
		self.is_prefix
	}

	/// Returns `true` if this is a prefix provider and `key` begins with its name.
	pub fn covers(&self, key: &str) -> bool {
		self.is_prefix && key.starts_with(&*self.name)
	}

	/// Returns `true` once all four callbacks are wired.
	pub fn is_complete(&self) -> bool {
		self.get.is_some() && self.has.is_some() && self.set.is_some() && self.erase.is_some()
	}

	pub fn on_get(&mut self, f: impl Fn(&str) -> i64 + 'static) -> &mut Self {
		self.get = Some(Box::new(f));
		self
	}

	pub fn on_has(&mut self, f: impl Fn(&str) -> bool + 'static) -> &mut Self {
		self.has = Some(Box::new(f));
		self
	}

	/// Wires the write callback. Returning `false` refuses the write.
	pub fn on_set(&mut self, f: impl Fn(&str, i64) -> bool + 'static) -> &mut Self {
		self.set = Some(Box::new(f));
		self
	}

	/// Wires the erase callback. Returning `false` refuses the erase.
	pub fn on_erase(&mut self, f: impl Fn(&str) -> bool + 'static) -> &mut Self {
		self.erase = Some(Box::new(f));
		self
	}

	pub(crate) fn get(&self, key: &str) -> Result<i64> {
		let f = self.get.as_ref().ok_or_else(|| self.missing(CallbackSlot::Get))?;
		Ok(f(key))
	}

	pub(crate) fn has(&self, key: &str) -> Result<bool> {
		let f = self.has.as_ref().ok_or_else(|| self.missing(CallbackSlot::Has))?;
		Ok(f(key))
	}

	pub(crate) fn set(&self, key: &str, value: i64) -> Result<bool> {
		let f = self.set.as_ref().ok_or_else(|| self.missing(CallbackSlot::Set))?;
		let accepted = f(key, value);
		if !accepted {
			tracing::trace!(provider = %self.name, key, value, "provider refused write");
		}
		Ok(accepted)
	}

	pub(crate) fn erase(&self, key: &str) -> Result<bool> {
		let f = self.erase.as_ref().ok_or_else(|| self.missing(CallbackSlot::Erase))?;
		Ok(f(key))
	}

	/// Read-modify-write through this provider's own get and set.
	pub(crate) fn update(&self, key: &str, op: impl FnOnce(i64) -> i64) -> Result<bool> {
		let current = self.get(key)?;
		self.set(key, op(current))
	}

	fn missing(&self, slot: CallbackSlot) -> ConditionError {
		ConditionError::MissingCallback {
			provider: self.name.to_string(),
			slot,
		}
	}
}

impl fmt::Debug for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Provider")
			.field("name", &self.name)
			.field("is_prefix", &self.is_prefix)
			.field("get", &self.get.is_some())
			.field("has", &self.has.is_some())
			.field("set", &self.set.is_some())
			.field("erase", &self.erase.is_some())
			.finish()
	}
}
