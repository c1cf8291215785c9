//! Typed cell values.
//!
//! A [`Value`] is what one cell becomes after conversion. Serialization is
//! JSON-oriented: numbers stay numbers, byte blobs become base64 strings and
//! temporal values become ISO-8601 strings.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::kind::SemanticKind;

/// A converted cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL, whatever the column kind.
    Null,
    Int32(i32),
    Int64(i64),
    Float64(f64),
    /// Text, either a `string` column or the fallback for a failed conversion.
    Str(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    /// Time of day, no date component.
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    /// Instant with whole-second precision.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Kind this value would have been produced for. `None` for [`Value::Null`].
    pub fn kind(&self) -> Option<SemanticKind> {
        match self {
            Value::Null => None,
            Value::Int32(_) => Some(SemanticKind::Int32),
            Value::Int64(_) => Some(SemanticKind::Int64),
            Value::Float64(_) => Some(SemanticKind::Float64),
            Value::Str(_) => Some(SemanticKind::String),
            Value::Bytes(_) => Some(SemanticKind::Bytes),
            Value::Date(_) => Some(SemanticKind::Date),
            Value::Time(_) => Some(SemanticKind::Time),
            Value::DateTime(_) => Some(SemanticKind::DateTime),
            Value::Timestamp(_) => Some(SemanticKind::Timestamp),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    #[inline]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            // JSON has no NaN/inf
            Value::Float64(v) if !v.is_finite() => serializer.serialize_unit(),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&BASE64_STANDARD.encode(b)),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::Time(t) => serializer.collect_str(&t.format("%H:%M:%S%.f")),
            Value::DateTime(dt) => serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}
