//! Raw cell text to typed [`Value`] conversion.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ConversionError;
use crate::kind::SemanticKind;
use crate::value::Value;

const DATE_LAYOUT: &str = "dddd-dd-dd";
const DATETIME_LAYOUT: &str = "dddd-dd-dd dd:dd:dd";
const TIME_LAYOUT: &str = "dd:dd:dd";

/// Convert the text of one cell to a value of `kind`.
///
/// `string` cells pass through unchanged and never fail. `bytes` cells are
/// normally handled by the caller on the raw payload; given text, the text's
/// bytes are returned.
pub fn convert(raw: &str, kind: SemanticKind) -> Result<Value, ConversionError> {
    let fail = |reason: String| ConversionError::new(kind, raw, reason);

    match kind {
        SemanticKind::Int64 => parse_int(raw).map(Value::Int64).map_err(fail),
        SemanticKind::Int32 => {
            let wide = parse_int(raw).map_err(fail)?;
            i32::try_from(wide)
                .map(Value::Int32)
                .map_err(|_| fail("out of range for int32".to_string()))
        }
        SemanticKind::Float64 => raw
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| fail(e.to_string())),
        SemanticKind::Date => parse_date(raw).map(Value::Date).map_err(fail),
        SemanticKind::DateTime => parse_datetime(raw).map(Value::DateTime).map_err(fail),
        SemanticKind::Time => parse_time(raw).map(Value::Time).map_err(fail),
        SemanticKind::Timestamp => parse_epoch_millis(raw).map(Value::Timestamp).map_err(fail),
        SemanticKind::Bytes => Ok(Value::Bytes(raw.as_bytes().to_vec())),
        SemanticKind::String => Ok(Value::Str(raw.to_string())),
    }
}

/// Parse a signed 64-bit integer, detecting the base from its prefix.
///
/// `0x`/`0X` is hexadecimal, `0b`/`0B` binary, `0o`/`0O` or a bare leading
/// `0` octal, anything else decimal. `_` separators are accepted between
/// digits only when a base prefix is present.
pub fn parse_int(raw: &str) -> Result<i64, String> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits, prefixed) = split_radix(unsigned);
    if digits.is_empty() {
        return Err("no digits".to_string());
    }

    let digits: Cow<'_, str> = if digits.contains('_') {
        if !prefixed || !separators_ok(digits) {
            return Err("misplaced digit separator".to_string());
        }
        Cow::Owned(digits.replace('_', ""))
    } else {
        Cow::Borrowed(digits)
    };

    // from_str_radix takes its own sign; a second one is malformed
    if digits.starts_with(['+', '-']) {
        return Err("invalid digit found in string".to_string());
    }

    let signed = if negative {
        Cow::Owned(format!("-{digits}"))
    } else {
        digits
    };
    i64::from_str_radix(&signed, radix).map_err(|e| e.to_string())
}

fn split_radix(s: &str) -> (u32, &str, bool) {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        return match bytes[1] {
            b'x' | b'X' => (16, &s[2..], true),
            b'b' | b'B' => (2, &s[2..], true),
            b'o' | b'O' => (8, &s[2..], true),
            _ => (8, &s[1..], true),
        };
    }
    (10, s, false)
}

/// Separators may follow the prefix, but not end the literal or repeat.
fn separators_ok(digits: &str) -> bool {
    !digits.ends_with('_') && !digits.contains("__")
}

/// Whether `raw` has the shape of `layout`, where `d` stands for one ASCII
/// digit and every other byte must match literally.
fn matches_layout(raw: &str, layout: &str) -> bool {
    raw.len() == layout.len()
        && raw
            .bytes()
            .zip(layout.bytes())
            .all(|(r, l)| if l == b'd' { r.is_ascii_digit() } else { r == l })
}

/// Like [`matches_layout`], also accepting a `.` and up to nine fractional
/// second digits after the layout.
fn matches_layout_with_fraction(raw: &str, layout: &str) -> bool {
    if raw.len() < layout.len() || !raw.is_char_boundary(layout.len()) {
        return false;
    }
    let (head, tail) = raw.split_at(layout.len());
    if !matches_layout(head, layout) {
        return false;
    }
    match tail.strip_prefix('.') {
        None => tail.is_empty(),
        Some(frac) => (1..=9).contains(&frac.len()) && frac.bytes().all(|b| b.is_ascii_digit()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    if !matches_layout(raw, DATE_LAYOUT) {
        return Err("expected YYYY-MM-DD".to_string());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    if !matches_layout_with_fraction(raw, DATETIME_LAYOUT) {
        return Err("expected YYYY-MM-DD HH:MM:SS".to_string());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map_err(|e| e.to_string())
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    if !matches_layout_with_fraction(raw, TIME_LAYOUT) {
        return Err("expected HH:MM:SS".to_string());
    }
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f").map_err(|e| e.to_string())
}

/// Millisecond epoch integer to an instant, truncated to whole seconds.
fn parse_epoch_millis(raw: &str) -> Result<DateTime<chrono::Utc>, String> {
    let millis = parse_int(raw)?;
    let secs = millis / 1000;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("{secs}s is out of range"))
}
