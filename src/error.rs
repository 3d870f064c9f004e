//! Error type for JSON to XML conversion.

use std::io;
use thiserror::Error;

/// An error that aborts a conversion.
///
/// Output already written to the destination is left in place.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The JSON input is malformed, truncated, or could not be read.
    #[error("invalid JSON input: {0}")]
    Tokenize(#[from] serde_json::Error),
    /// The tokenizer produced a value kind outside the JSON data model.
    #[error("unexpected token kind from JSON tokenizer: {kind}")]
    UnexpectedToken { kind: &'static str },
    /// Input ended while containers were still open.
    #[error("input ended with {open} unterminated container(s)")]
    UnterminatedContainer { open: usize },
    /// A closing delimiter did not match the innermost open container.
    #[error("closing `{found}` does not match any open container")]
    MismatchedClose { found: char },
    /// Writing XML to the destination failed.
    #[error("failed to write XML output: {0}")]
    Emit(#[from] io::Error),
}
