//! Hybrid condition store.
//!
//! Named 64-bit integer conditions come in two kinds behind one interface:
//!
//! - **primary** conditions, stored directly in the index;
//! - **derived** conditions, answered by [`Provider`] callbacks registered
//!   for one exact key or for every key sharing a prefix.
//!
//! ```ignore
//! let mut store = ConditionsStore::new();
//! store.set("visited Earth", 1);
//! store
//! 	.provider_prefixed("ships: ")
//! 	.on_get(|key| fleet.count(&key["ships: ".len()..]))
//! 	.on_has(|_| true)
//! 	.on_set(|_, _| false)
//! 	.on_erase(|_| false);
//!
//! assert_eq!(store.get("ships: Falcon"), 2);
//! assert!(!store.set("ships: Falcon", 5));
//! ```
//!
//! Unknown keys read as `0` and writes create them. Provider refusals come
//! back as `false`. Each operation has a `try_*` twin that reports a provider
//! with an unwired callback as [`ConditionError::MissingCallback`]; the plain
//! operations log it and return the neutral result instead.

/// Index entries and the live entry handle.
pub mod entry;
/// Error types.
pub mod error;
/// Primary-entry iteration.
pub mod iter;
/// Data file loading and saving.
pub mod persist;
/// Derived-value providers.
pub mod provider;
/// Provider ownership.
pub mod registry;
#[cfg(feature = "serde")]
mod ser;
/// The store itself.
pub mod store;

#[cfg(all(test, not(feature = "serde")))]
use serde_json as _;

pub use entry::{Entry, EntryMut};
pub use error::{CallbackSlot, ConditionError, Result};
pub use iter::PrimaryIter;
pub use persist::CONDITIONS_NODE;
pub use provider::{Provider, ProviderId};
pub use registry::ProviderRegistry;
pub use store::ConditionsStore;
