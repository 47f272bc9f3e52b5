use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Character positions of `candidate` to emphasise for `query` in a
/// suggestion dropdown. Presentation only; membership is decided by
/// [`crate::fuzzy::fuzzy_match`].
pub fn highlight_indices(query: &str, candidate: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let matcher = SkimMatcherV2::default().ignore_case();
    matcher
        .fuzzy_indices(candidate, query)
        .map(|(_score, idx)| idx)
        .unwrap_or_default()
}

/// Wraps highlighted characters in `open`/`close` markers for terminal output.
pub fn mark(candidate: &str, indices: &[usize], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + indices.len() * (open.len() + close.len()));
    for (i, ch) in candidate.chars().enumerate() {
        if indices.binary_search(&i).is_ok() {
            out.push_str(open);
            out.push(ch);
            out.push_str(close);
        } else {
            out.push(ch);
        }
    }
    out
}
