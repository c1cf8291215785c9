//! Table export for rowdump
//!
//! This crate turns the rows of a database table into typed
//! [`StructuredRow`](rowdump_tabular::StructuredRow)s. It sits between a
//! [`TabularSource`] (a live MySQL server, or an in-memory fixture) and the
//! value model in `rowdump-tabular`.
//!
//! # Pipeline
//!
//! 1. [`inspect`] describes the table and maps each declared column type to a
//!    [`SemanticKind`](rowdump_tabular::SemanticKind) through the type catalog.
//! 2. [`materialize`] runs the data query (`SELECT *` or a custom query) and
//!    converts every cell according to that map.
//!
//! [`export_table`] runs both steps in order. A schema failure stops the
//! export before any data query is issued. A cell that fails conversion keeps
//! its raw text and is counted in [`Materialized::conversion_failures`].
//!
//! # Features
//!
//! - `mysql` (default): [`MySqlSource`] backed by sqlx

pub mod error;
pub mod inspect;
pub mod materialize;
pub mod memory;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod source;

pub use error::{ExportError, Result};
pub use inspect::{column_type_map, inspect};
pub use materialize::{export_table, materialize, ExportRequest, Materialized, Selection};
pub use memory::{text_row, MemorySource};
#[cfg(feature = "mysql")]
pub use mysql::{MySqlSettings, MySqlSource, Protocol};
pub use source::{
    quote_identifier, select_all, ColumnDescription, QueryRows, RawCell, RawRow, TabularSource,
};
