//! Runtime knobs for list-view search, read from `ACTA_*` environment variables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub case_sensitive: bool,
    pub fuzzy_threshold: f64,
    pub max_suggestions: usize,
    pub history_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            case_sensitive: false,
            fuzzy_threshold: 0.6,
            max_suggestions: 8,
            history_cap: 10,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by any parsable `ACTA_*` variable.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let threshold = get("ACTA_FUZZY_THRESHOLD")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .unwrap_or(d.fuzzy_threshold);
        Self {
            debounce_ms: get("ACTA_DEBOUNCE_MS").and_then(|s| s.parse().ok()).unwrap_or(d.debounce_ms),
            case_sensitive: get("ACTA_CASE_SENSITIVE").and_then(|s| parse_flag(&s)).unwrap_or(d.case_sensitive),
            fuzzy_threshold: threshold.clamp(0.0, 1.0),
            max_suggestions: get("ACTA_MAX_SUGGESTIONS").and_then(|s| s.parse().ok()).unwrap_or(d.max_suggestions),
            history_cap: get("ACTA_HISTORY_CAP").and_then(|s| s.parse().ok()).unwrap_or(d.history_cap),
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
