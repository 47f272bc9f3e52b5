//! Typed filter values: one variant per filter kind, with the inactive
//! default, the record predicate and the chip label for each.

use std::collections::BTreeSet;
use std::fmt;

use acta_core::{ActaError, ActaResult, FieldValue};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;

/// Value of a select filter that lets everything through.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Select,
    MultiSelect,
    Boolean,
    Date,
    Range,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Select => "select",
            FilterKind::MultiSelect => "multiselect",
            FilterKind::Boolean => "boolean",
            FilterKind::Date => "date",
            FilterKind::Range => "range",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FilterValue {
    Select(String),
    MultiSelect(BTreeSet<String>),
    Boolean(bool),
    Date(Option<NaiveDate>),
    Range { min: Option<f64>, max: Option<f64> },
}

impl FilterValue {
    /// The value under which a filter of `kind` excludes nothing.
    pub fn inactive(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Select => FilterValue::Select(ALL.to_string()),
            FilterKind::MultiSelect => FilterValue::MultiSelect(BTreeSet::new()),
            FilterKind::Boolean => FilterValue::Boolean(false),
            FilterKind::Date => FilterValue::Date(None),
            FilterKind::Range => FilterValue::Range { min: None, max: None },
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterValue::Select(_) => FilterKind::Select,
            FilterValue::MultiSelect(_) => FilterKind::MultiSelect,
            FilterValue::Boolean(_) => FilterKind::Boolean,
            FilterValue::Date(_) => FilterKind::Date,
            FilterValue::Range { .. } => FilterKind::Range,
        }
    }

    pub fn is_inactive(&self) -> bool {
        match self {
            FilterValue::Select(v) => v == ALL,
            FilterValue::MultiSelect(set) => set.is_empty(),
            FilterValue::Boolean(b) => !*b,
            FilterValue::Date(d) => d.is_none(),
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
        }
    }

    /// Range bounds must be finite and ordered; every other value is.
    pub fn is_well_formed(&self) -> bool {
        match self {
            FilterValue::Range { min, max } => {
                let finite = |b: &Option<f64>| b.map(f64::is_finite).unwrap_or(true);
                finite(min) && finite(max) && !matches!((min, max), (Some(lo), Some(hi)) if lo > hi)
            }
            _ => true,
        }
    }

    /// Predicate for one record field. `field` is `None` when the record
    /// lacks the field.
    pub fn matches(&self, field: Option<&FieldValue<'_>>) -> bool {
        if self.is_inactive() {
            return true;
        }
        match self {
            FilterValue::Select(want) => field.map(|f| f.equals_str(want)).unwrap_or(false),
            FilterValue::MultiSelect(wanted) => {
                field.map(|f| wanted.iter().any(|w| f.contains_str(w))).unwrap_or(false)
            }
            FilterValue::Boolean(_) => matches!(field, Some(FieldValue::Bool(true))),
            FilterValue::Date(Some(day)) => field.and_then(|f| f.as_date()).map(|d| d == *day).unwrap_or(false),
            FilterValue::Date(None) => true,
            FilterValue::Range { min, max } => match field.and_then(|f| f.as_number()) {
                // Values that are not numbers are never excluded by a range.
                None => true,
                Some(n) => min.map(|m| n >= m).unwrap_or(true) && max.map(|m| n <= m).unwrap_or(true),
            },
        }
    }

    /// Human label for an active-filter chip.
    pub fn display(&self, cfg: &FilterConfig) -> String {
        match self {
            FilterValue::Select(v) => cfg.option_label(v).to_string(),
            FilterValue::MultiSelect(set) => match set.len() {
                1 => set.iter().next().map(|v| cfg.option_label(v).to_string()).unwrap_or_default(),
                n => format!("{} selected", n),
            },
            FilterValue::Boolean(b) => (if *b { "Yes" } else { "No" }).to_string(),
            FilterValue::Date(Some(d)) => d.format("%b %-d, %Y").to_string(),
            FilterValue::Date(None) => String::new(),
            FilterValue::Range { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("{}–{}", lo, hi),
                (Some(lo), None) => format!("≥{}", lo),
                (None, Some(hi)) => format!("≤{}", hi),
                (None, None) => String::new(),
            },
        }
    }

    /// Parse user text (command line, query string) into a value of `kind`.
    ///
    /// select: raw text; multiselect: comma list; boolean: true/false/yes/no/1/0;
    /// date: `YYYY-MM-DD` or `none`; range: `min..max`, either side optional.
    pub fn parse(kind: FilterKind, input: &str) -> ActaResult<Self> {
        let s = input.trim();
        let invalid = || ActaError::InvalidValue { kind: kind.as_str(), input: input.to_string() };
        match kind {
            FilterKind::Select => {
                if s.is_empty() { Ok(Self::inactive(kind)) } else { Ok(FilterValue::Select(s.to_string())) }
            }
            FilterKind::MultiSelect => Ok(FilterValue::MultiSelect(
                s.split(',').map(str::trim).filter(|v| !v.is_empty()).map(str::to_string).collect(),
            )),
            FilterKind::Boolean => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(FilterValue::Boolean(true)),
                "false" | "no" | "0" | "" => Ok(FilterValue::Boolean(false)),
                _ => Err(invalid()),
            },
            FilterKind::Date => {
                if s.is_empty() || s.eq_ignore_ascii_case("none") {
                    return Ok(FilterValue::Date(None));
                }
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| FilterValue::Date(Some(d))).map_err(|_| invalid())
            }
            FilterKind::Range => {
                let (lo, hi) = s.split_once("..").ok_or_else(invalid)?;
                let bound = |b: &str| -> ActaResult<Option<f64>> {
                    let b = b.trim();
                    if b.is_empty() {
                        return Ok(None);
                    }
                    b.parse::<f64>().ok().filter(|n| n.is_finite()).map(Some).ok_or_else(invalid)
                };
                let v = FilterValue::Range { min: bound(lo)?, max: bound(hi)? };
                if v.is_well_formed() { Ok(v) } else { Err(invalid()) }
            }
        }
    }
}
