//! Tabular data source abstraction.
//!
//! The export pipeline only needs two capabilities from a database: describe
//! the columns of a table, and run a query returning raw cells. Both are
//! expressed by [`TabularSource`].

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

/// One cell as returned by the source, before conversion. `None` is SQL NULL.
pub type RawCell = Option<Vec<u8>>;

/// One result row, one cell per result column.
pub type RawRow = Vec<RawCell>;

/// Column metadata from a schema description.
///
/// Only `name` and `source_type` drive the export; the rest is carried for
/// callers that want it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Column name
    pub name: String,
    /// Database type descriptor, e.g. `"int(11)"`
    pub source_type: String,
    pub nullable: bool,
    pub key: Option<String>,
    pub default: Option<String>,
    pub extra: Option<String>,
}

impl ColumnDescription {
    /// Description with only a name and a type.
    pub fn new(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            nullable: true,
            key: None,
            default: None,
            extra: None,
        }
    }
}

/// Result of [`TabularSource::execute_query`].
pub struct QueryRows<'a> {
    /// Result column names in order. May be empty when no row was returned.
    pub columns: Vec<String>,
    /// Rows, read lazily. A mid-stream failure is yielded as an error item.
    pub rows: BoxStream<'a, Result<RawRow>>,
}

impl std::fmt::Debug for QueryRows<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRows")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// Schema description and query execution against a database.
#[async_trait]
pub trait TabularSource: std::fmt::Debug + Send + Sync {
    /// Describe the columns of `table`.
    ///
    /// Fails with [`ExportError::Schema`](crate::ExportError::Schema) when the
    /// metadata query fails.
    async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescription>>;

    /// Run `query` and return its columns and a lazy row stream.
    ///
    /// Fails with [`ExportError::Query`](crate::ExportError::Query) when the
    /// query cannot be executed.
    async fn execute_query<'a>(&'a self, query: &'a str) -> Result<QueryRows<'a>>;
}

/// Backtick-quote a table name, one quoted part per `.`-separated segment.
///
/// Names that already contain a backtick are assumed to be quoted by the
/// caller and returned unchanged.
pub fn quote_identifier(name: &str) -> String {
    if name.contains('`') {
        return name.to_string();
    }
    name.split('.')
        .map(|part| format!("`{part}`"))
        .collect::<Vec<_>>()
        .join(".")
}

/// The query used to export a whole table.
pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}
