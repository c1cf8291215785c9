//! Typed row values for rowdump.
//!
//! This crate holds the schema-free half of the export pipeline: the mapping
//! from source column types to semantic kinds, the conversion of raw cell
//! text into typed values, and the row containers handed to serializers.
//!
//! # Design
//!
//! - **Closed kind set**: every column maps to exactly one [`SemanticKind`],
//!   unknown source types fall back to [`SemanticKind::String`]
//! - **Strongly typed values**: cells are [`Value`] variants, no `dyn Any`
//! - **Pure conversion**: [`convert`] has no side effects; callers decide what
//!   to do with a [`ConversionError`]

pub mod convert;
pub mod error;
pub mod kind;
pub mod row;
pub mod value;

pub use convert::{convert, parse_int};
pub use error::ConversionError;
pub use kind::SemanticKind;
pub use row::{ColumnTypeMap, ResultSequence, StructuredRow};
pub use value::Value;
