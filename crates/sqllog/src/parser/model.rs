use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Decoded annotations, keyed by annotation name (or column name for dumped
/// rows). A later insert of the same key replaces the earlier value.
pub type Fields = BTreeMap<String, Value>;

/// A single typed value: an annotation value or a dumped table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Bracket-string annotation, or a character/binary column
    Text(String),
    /// Signed integer annotation, or an integer column
    Int(i64),
    /// Date/time column
    Timestamp(DateTime<Utc>),
    /// `key=` with nothing after it, or a NULL cell
    Null,
    /// Any other column type, carried as its display text
    Other(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Other(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}
