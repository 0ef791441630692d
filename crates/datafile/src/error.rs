use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing a data file.
///
/// Parsing itself is lenient and never fails. Writing fails on filesystem
/// errors and on tokens no quoting can preserve.
#[derive(Debug, Error)]
pub enum DataFileError {
	/// Error reading or writing a data file.
	#[error("I/O error on {path}: {source}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// Token holds a line break, or both quote characters alongside text that
	/// needs quoting.
	#[error("token {token:?} cannot be written to a data file")]
	Unwritable {
		/// The offending token.
		token: String,
	},
}

/// Result type for data file operations.
pub type Result<T> = std::result::Result<T, DataFileError>;
