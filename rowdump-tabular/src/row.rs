//! Column kind maps and structured rows.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::kind::SemanticKind;
use crate::value::Value;

/// Column name to semantic kind for one table.
///
/// Built once by schema inspection and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypeMap {
    kinds: BTreeMap<String, SemanticKind>,
}

impl ColumnTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the kind of a column. A repeated name replaces the earlier kind.
    pub fn insert(&mut self, column: impl Into<String>, kind: SemanticKind) {
        self.kinds.insert(column.into(), kind);
    }

    /// Kind of `column`, if the column was described.
    #[inline]
    pub fn get(&self, column: &str) -> Option<SemanticKind> {
        self.kinds.get(column).copied()
    }

    /// Kind of `column`, defaulting to [`SemanticKind::String`] for columns
    /// the schema did not describe.
    #[inline]
    pub fn kind_of(&self, column: &str) -> SemanticKind {
        self.get(column).unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SemanticKind)> + '_ {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

impl<S: Into<String>> FromIterator<(S, SemanticKind)> for ColumnTypeMap {
    fn from_iter<I: IntoIterator<Item = (S, SemanticKind)>>(iter: I) -> Self {
        let mut map = ColumnTypeMap::new();
        for (name, kind) in iter {
            map.insert(name, kind);
        }
        map
    }
}

/// One exported row: column name to value, in result-set column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRow {
    fields: Vec<(String, Value)>,
}

impl StructuredRow {
    /// Build a row from `(column, value)` pairs. Column names are expected to
    /// be unique.
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Value of `column`, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

impl FromIterator<(String, Value)> for StructuredRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for StructuredRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Exported rows in source order.
pub type ResultSequence = Vec<StructuredRow>;
