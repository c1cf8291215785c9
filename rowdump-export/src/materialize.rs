//! Row materialization
//!
//! Runs the data query and turns every raw row into a [`StructuredRow`],
//! converting each cell according to the table's [`ColumnTypeMap`].
//!
//! Conversion failures are local to the cell: the raw text is kept, a
//! warning is logged and the export carries on. Only failures of the query
//! itself abort.

use std::collections::HashMap;

use futures::StreamExt;
use rowdump_tabular::{convert, ColumnTypeMap, ResultSequence, SemanticKind, StructuredRow, Value};
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::inspect::inspect;
use crate::source::{select_all, QueryRows, RawCell, RawRow, TabularSource};

/// What to export: a whole table or the result of a custom query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Table(String),
    Query(String),
}

impl Selection {
    /// SQL text to execute.
    pub fn query_text(&self) -> String {
        match self {
            Selection::Table(table) => select_all(table),
            Selection::Query(query) => query.clone(),
        }
    }
}

/// Rows produced by [`materialize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Materialized {
    /// Rows in source order.
    pub rows: ResultSequence,
    /// Cells that kept their raw text because conversion failed.
    pub conversion_failures: usize,
}

impl Materialized {
    pub fn into_rows(self) -> ResultSequence {
        self.rows
    }
}

/// Output key and kind for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnPlan {
    key: String,
    kind: SemanticKind,
}

/// Resolve the output key and kind of every result column.
///
/// Columns missing from `column_map` are `string`. A repeated column name
/// gets a `_2`, `_3`, ... suffix and the kind of the repeated name.
fn plan_columns(columns: &[String], column_map: &ColumnTypeMap) -> Vec<ColumnPlan> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    columns
        .iter()
        .map(|name| {
            let count = seen.entry(name.as_str()).or_insert(0);
            *count += 1;

            let mut key = if *count == 1 {
                name.clone()
            } else {
                format!("{name}_{count}")
            };
            // a suffixed key can itself collide with a real column name
            while *count > 1 && columns.contains(&key) {
                key.push('_');
            }
            if *count > 1 {
                debug!(column = %name, %key, "disambiguated duplicate column");
            }

            ColumnPlan {
                key,
                kind: column_map.kind_of(name),
            }
        })
        .collect()
}

/// Convert one raw cell, falling back to its text on conversion failure.
///
/// Returns the value and whether the fallback was taken.
fn materialize_cell(column: &str, cell: RawCell, kind: SemanticKind) -> (Value, bool) {
    let Some(bytes) = cell else {
        return (Value::Null, false);
    };

    if kind.is_binary() {
        return (Value::Bytes(bytes), false);
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };

    match convert(&text, kind) {
        Ok(value) => (value, false),
        Err(e) => {
            warn!(
                column,
                %kind,
                raw = %e.raw,
                reason = %e.reason,
                "cell conversion failed, keeping raw text"
            );
            (Value::Str(text), true)
        }
    }
}

fn materialize_row(
    plan: &[ColumnPlan],
    row: RawRow,
    query: &str,
    failures: &mut usize,
) -> Result<StructuredRow> {
    if row.len() != plan.len() {
        return Err(ExportError::query(
            query,
            format!("row has {} cells, expected {}", row.len(), plan.len()),
        ));
    }

    let fields = plan
        .iter()
        .zip(row)
        .map(|(col, cell)| {
            let (value, fell_back) = materialize_cell(&col.key, cell, col.kind);
            if fell_back {
                *failures += 1;
            }
            (col.key.clone(), value)
        })
        .collect();

    Ok(StructuredRow::new(fields))
}

/// Execute `selection` and convert every row using `column_map`.
///
/// Fails only if the query cannot be executed or its rows cannot be read; in
/// that case no rows are returned.
pub async fn materialize<S>(
    source: &S,
    selection: &Selection,
    column_map: &ColumnTypeMap,
) -> Result<Materialized>
where
    S: TabularSource + ?Sized,
{
    let query = selection.query_text();
    let QueryRows { columns, mut rows } = source.execute_query(&query).await?;
    let plan = plan_columns(&columns, column_map);

    let mut out = Materialized::default();
    while let Some(row) = rows.next().await {
        let row = materialize_row(&plan, row?, &query, &mut out.conversion_failures)?;
        out.rows.push(row);
    }

    info!(
        rows = out.rows.len(),
        conversion_failures = out.conversion_failures,
        "materialized rows"
    );
    Ok(out)
}

/// A table export: the table whose schema types the columns and an optional
/// custom query over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub table: String,
    pub query: Option<String>,
}

impl ExportRequest {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn selection(&self) -> Selection {
        match &self.query {
            Some(query) => Selection::Query(query.clone()),
            None => Selection::Table(self.table.clone()),
        }
    }
}

/// Inspect the table, then materialize the request's selection.
pub async fn export_table<S>(source: &S, request: &ExportRequest) -> Result<Materialized>
where
    S: TabularSource + ?Sized,
{
    let column_map = inspect(source, &request.table).await?;
    materialize(source, &request.selection(), &column_map).await
}
