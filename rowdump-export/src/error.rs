//! Export error types

use thiserror::Error;

/// Infrastructure failures that abort an export.
///
/// Per-cell conversion failures are not represented here; they are absorbed
/// by the materializer.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Table metadata could not be read
    #[error("Schema error for table '{table}': {message}")]
    Schema { table: String, message: String },

    /// The data query failed to execute or failed while reading rows
    #[error("Query error for '{query}': {message}")]
    Query { query: String, message: String },

    /// The data source could not be reached
    #[error("Connection error: {0}")]
    Connect(String),
}

impl ExportError {
    pub fn schema(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
