//! In-memory tabular source.
//!
//! Serves registered tables and canned query results without a database.
//! Tables answer both `describe_columns` and their [`select_all`] query.
//! Failures can be injected per table or per query.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::{ExportError, Result};
use crate::source::{select_all, ColumnDescription, QueryRows, RawRow, TabularSource};

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    columns: Vec<ColumnDescription>,
    rows: Vec<RawRow>,
    describe_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct MemoryResult {
    columns: Vec<String>,
    rows: Vec<RawRow>,
    execute_error: Option<String>,
    /// Yield an error after this many rows.
    fail_after: Option<(usize, String)>,
}

/// A [`TabularSource`] backed by maps.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, MemoryTable>,
    queries: HashMap<String, MemoryResult>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table with its schema and rows (cells in column order).
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        columns: Vec<ColumnDescription>,
        rows: Vec<RawRow>,
    ) -> Self {
        let name = name.into();
        let result = MemoryResult {
            columns: columns.iter().map(|c| c.name.clone()).collect(),
            rows: rows.clone(),
            ..Default::default()
        };
        self.queries.insert(select_all(&name), result);
        self.tables.insert(
            name,
            MemoryTable {
                columns,
                rows,
                describe_error: None,
            },
        );
        self
    }

    /// Register the result of a custom query.
    pub fn with_query(
        mut self,
        query: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<RawRow>,
    ) -> Self {
        self.queries.insert(
            query.into(),
            MemoryResult {
                columns,
                rows,
                ..Default::default()
            },
        );
        self
    }

    /// Make `describe_columns(table)` fail.
    pub fn fail_describe(mut self, table: &str, message: impl Into<String>) -> Self {
        self.tables.entry(table.to_string()).or_default().describe_error = Some(message.into());
        self
    }

    /// Make `query` fail before returning any row.
    pub fn fail_execute(mut self, query: &str, message: impl Into<String>) -> Self {
        self.queries.entry(query.to_string()).or_default().execute_error = Some(message.into());
        self
    }

    /// Make the row stream of `query` fail after `rows` rows.
    pub fn fail_stream_after(mut self, query: &str, rows: usize, message: impl Into<String>) -> Self {
        self.queries.entry(query.to_string()).or_default().fail_after = Some((rows, message.into()));
        self
    }

    /// Number of rows stored for `table`.
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.tables.get(table).map(|t| t.rows.len())
    }
}

#[async_trait]
impl TabularSource for MemorySource {
    async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescription>> {
        let entry = self
            .tables
            .get(table)
            .ok_or_else(|| ExportError::schema(table, format!("table '{table}' doesn't exist")))?;

        if let Some(message) = &entry.describe_error {
            return Err(ExportError::schema(table, message.clone()));
        }
        Ok(entry.columns.clone())
    }

    async fn execute_query<'a>(&'a self, query: &'a str) -> Result<QueryRows<'a>> {
        let result = self
            .queries
            .get(query)
            .ok_or_else(|| ExportError::query(query, "no such table or query"))?;

        if let Some(message) = &result.execute_error {
            return Err(ExportError::query(query, message.clone()));
        }

        let limit = result.fail_after.as_ref().map_or(result.rows.len(), |(n, _)| *n);
        let ok_rows = result.rows.iter().take(limit).cloned().map(Ok);
        let failure = result
            .fail_after
            .as_ref()
            .map(|(_, message)| Err(ExportError::query(query, message.clone())));

        Ok(QueryRows {
            columns: result.columns.clone(),
            rows: stream::iter(ok_rows.chain(failure)).boxed(),
        })
    }
}

/// Build a raw row from optional text cells.
pub fn text_row(cells: &[Option<&str>]) -> RawRow {
    cells
        .iter()
        .map(|cell| cell.map(|s| s.as_bytes().to_vec()))
        .collect()
}
