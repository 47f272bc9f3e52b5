//! Acta core types: the record model list views search and filter over.

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use smallvec::SmallVec;

pub mod config;
pub mod error;
pub mod records;

pub use config::SearchConfig;
pub use error::{ActaError, ActaResult};
pub use records::{Activity, ActivityStatus, Role, User};

/// A single field value as seen by the search and filter engines.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    List(SmallVec<[&'a str; 4]>),
}

impl<'a> FieldValue<'a> {
    /// String view for text search. Only `Text` qualifies.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Calendar day of the value. Timestamps keep their own offset.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_day(s),
            _ => None,
        }
    }

    /// Scalar equality against a stored filter value.
    pub fn equals_str(&self, want: &str) -> bool {
        match self {
            FieldValue::Text(s) => *s == want,
            FieldValue::Number(n) => want.parse::<f64>().map(|w| w == *n).unwrap_or(false),
            FieldValue::Bool(b) => want == if *b { "true" } else { "false" },
            FieldValue::Date(d) => parse_day(want).map(|w| w == *d).unwrap_or(false),
            FieldValue::List(_) => false,
        }
    }

    /// Equality for scalars, membership for lists.
    pub fn contains_str(&self, want: &str) -> bool {
        match self {
            FieldValue::List(items) => items.iter().any(|s| *s == want),
            other => other.equals_str(want),
        }
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    chrono::DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Anything the engines can read fields from.
pub trait Record {
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }
}

/// Loosely typed records, e.g. a JSON array loaded from disk.
impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        use serde_json::Value;
        match self.get(name)? {
            Value::String(s) => Some(FieldValue::Text(s)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Array(items) => Some(FieldValue::List(items.iter().filter_map(|v| v.as_str()).collect())),
            Value::Null | Value::Object(_) => None,
        }
    }
}

pub mod prelude {
    pub use super::{ActaError, ActaResult, Activity, FieldValue, Record, SearchConfig, User};
}
