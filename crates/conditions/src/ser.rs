use serde::{Serialize, Serializer};

use crate::store::ConditionsStore;

/// Serializes as a map of the primary entries in key order.
impl Serialize for ConditionsStore {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.primaries())
	}
}
