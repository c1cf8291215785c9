//! Semantic column kinds and the source type catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target value category of a column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticKind {
    Int32,
    Int64,
    Float64,
    #[default]
    String,
    Bytes,
    Date,
    Time,
    DateTime,
    Timestamp,
}

/// Prefixes that share a stem with a catalog entry. Checked before [`CATALOG`].
const AMBIGUOUS: &[(&str, SemanticKind)] = &[
    ("datetime", SemanticKind::DateTime),
    ("timestamp", SemanticKind::Timestamp),
];

/// Source type-name prefix to kind. No entry is a prefix of another, so the
/// scan order does not matter.
const CATALOG: &[(&str, SemanticKind)] = &[
    ("tinyint", SemanticKind::Int32),
    ("smallint", SemanticKind::Int32),
    ("mediumint", SemanticKind::Int64),
    ("int", SemanticKind::Int64),
    ("bigint", SemanticKind::Int64),
    ("float", SemanticKind::Float64),
    ("double", SemanticKind::Float64),
    ("decimal", SemanticKind::Float64),
    ("bit", SemanticKind::Bytes),
    ("char", SemanticKind::String),
    ("varchar", SemanticKind::String),
    ("tinytext", SemanticKind::String),
    ("text", SemanticKind::String),
    ("mediumtext", SemanticKind::String),
    ("longtext", SemanticKind::String),
    ("binary", SemanticKind::Bytes),
    ("varbinary", SemanticKind::Bytes),
    ("tinyblob", SemanticKind::Bytes),
    ("blob", SemanticKind::Bytes),
    ("mediumblob", SemanticKind::Bytes),
    ("longblob", SemanticKind::Bytes),
    ("enum", SemanticKind::String),
    ("set", SemanticKind::String),
    ("date", SemanticKind::Date),
    ("time", SemanticKind::Time),
    ("year", SemanticKind::Int32),
];

impl SemanticKind {
    /// All kinds, in declaration order.
    pub const ALL: [SemanticKind; 9] = [
        SemanticKind::Int32,
        SemanticKind::Int64,
        SemanticKind::Float64,
        SemanticKind::String,
        SemanticKind::Bytes,
        SemanticKind::Date,
        SemanticKind::Time,
        SemanticKind::DateTime,
        SemanticKind::Timestamp,
    ];

    /// Map a database type descriptor such as `"int(11)"` or
    /// `"varchar(50)"` to its kind.
    ///
    /// Matching is by prefix, ASCII case-insensitive, ignoring leading
    /// whitespace. Anything not in the catalog is [`SemanticKind::String`].
    pub fn for_source_type(type_name: &str) -> Self {
        let normalized = type_name.trim_start().to_ascii_lowercase();

        AMBIGUOUS
            .iter()
            .chain(CATALOG.iter())
            .find(|(prefix, _)| normalized.starts_with(prefix))
            .map_or(SemanticKind::String, |&(_, kind)| kind)
    }

    /// Lowercase tag name, e.g. `"int64"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticKind::Int32 => "int32",
            SemanticKind::Int64 => "int64",
            SemanticKind::Float64 => "float64",
            SemanticKind::String => "string",
            SemanticKind::Bytes => "bytes",
            SemanticKind::Date => "date",
            SemanticKind::Time => "time",
            SemanticKind::DateTime => "datetime",
            SemanticKind::Timestamp => "timestamp",
        }
    }

    /// Whether cells of this kind bypass text conversion.
    #[inline]
    pub fn is_binary(self) -> bool {
        matches!(self, SemanticKind::Bytes)
    }
}

impl fmt::Display for SemanticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown semantic kind '{s}'"))
    }
}
