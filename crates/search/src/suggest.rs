//! Autocomplete candidates drawn from the corpus itself.

use acta_core::Record;
use rustc_hash::FxHashSet;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// Terms shorter than this produce no suggestions.
const MIN_TERM_CHARS: usize = 2;

/// Whole field values and single words that contain `term`
/// (case-insensitive), first-seen order, at most `max` entries.
pub fn suggestions<R: Record>(corpus: &[R], fields: &[String], term: &str, max: usize) -> Vec<String> {
    if term.chars().count() < MIN_TERM_CHARS || max == 0 {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();
    for rec in corpus {
        for f in fields {
            let Some(value) = rec.field(f).and_then(|v| v.as_text()) else { continue };
            if !value.to_lowercase().contains(&needle) {
                continue;
            }
            push_unique(value, &mut seen, &mut out);
            for word in value.split_whitespace() {
                if word.to_lowercase().contains(&needle) {
                    push_unique(word, &mut seen, &mut out);
                }
            }
            if out.len() >= max {
                out.truncate(max);
                return out;
            }
        }
    }
    out
}

fn push_unique<'a>(s: &'a str, seen: &mut FxHashSet<&'a str>, out: &mut Vec<String>) {
    if seen.insert(s) {
        out.push(s.to_string());
    }
}
