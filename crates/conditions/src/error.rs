use std::fmt;

/// One of the four callbacks a [`Provider`](crate::Provider) answers through.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CallbackSlot {
	Get,
	Has,
	Set,
	Erase,
}

impl fmt::Display for CallbackSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Get => "get",
			Self::Has => "has",
			Self::Set => "set",
			Self::Erase => "erase",
		})
	}
}

/// Errors surfaced by the fallible (`try_*`) store operations.
///
/// Absent keys and refused writes are not errors; they are reported through
/// zero values and `false` results.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ConditionError {
	/// A provider was exercised through a callback that was never wired.
	#[error("provider {provider:?} has no {slot} callback")]
	MissingCallback { provider: String, slot: CallbackSlot },
}

/// Result type for fallible condition operations.
pub type Result<T> = std::result::Result<T, ConditionError>;
