//! Error types for cell conversion.

use thiserror::Error;

use crate::kind::SemanticKind;

/// A single cell could not be converted to its column's kind.
///
/// Recoverable by design of the export: the materializer keeps the raw text
/// and logs this error instead of returning it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {raw:?} as {kind}: {reason}")]
pub struct ConversionError {
    /// Kind the cell was being converted to.
    pub kind: SemanticKind,
    /// The offending raw text.
    pub raw: String,
    /// Parser diagnostic.
    pub reason: String,
}

impl ConversionError {
    pub fn new(kind: SemanticKind, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
