//! Indentation-structured token data files.
//!
//! A data file is a tree of nodes. Each non-blank line is one node holding a
//! sequence of whitespace-separated tokens; a line indented deeper than the
//! line before it becomes a child of that line.
//!
//! ```text
//! conditions
//! 	"visited Earth"
//! 	"credits earned" 1500
//! 	`said "hello"` 2
//! ```
//!
//! Tokens with whitespace are quoted with `"`, tokens containing `"` are
//! quoted with backticks, and `#` at the start of a token begins a comment.
//! Tokens with line breaks cannot be written.

/// Error types for reading and writing data files.
pub mod error;
/// Node tree produced by the parser.
pub mod node;
/// Text to node tree parsing.
pub mod parse;
/// Node tree to text serialization.
pub mod writer;

pub use error::{DataFileError, Result};
pub use node::DataNode;
pub use parse::DataFile;
pub use writer::{DataWriter, is_writable};
