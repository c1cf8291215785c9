//! Schema inspection: table metadata to a [`ColumnTypeMap`].

use rowdump_tabular::{ColumnTypeMap, SemanticKind};
use tracing::{debug, info};

use crate::error::Result;
use crate::source::{ColumnDescription, TabularSource};

/// Build the column kind map for `table`.
///
/// Either every described column is mapped or the schema error is returned;
/// no partial map escapes.
pub async fn inspect<S>(source: &S, table: &str) -> Result<ColumnTypeMap>
where
    S: TabularSource + ?Sized,
{
    let columns = source.describe_columns(table).await?;
    let map = column_type_map(&columns);
    info!(table, columns = map.len(), "inspected table schema");
    Ok(map)
}

/// Map column descriptions through the type catalog.
pub fn column_type_map(columns: &[ColumnDescription]) -> ColumnTypeMap {
    columns
        .iter()
        .map(|col| {
            let kind = SemanticKind::for_source_type(&col.source_type);
            debug!(column = %col.name, source_type = %col.source_type, %kind, "mapped column");
            (col.name.as_str(), kind)
        })
        .collect()
}
