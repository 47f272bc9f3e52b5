//! Substring-or-edit-distance matching used to decide search membership.

pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Queries shorter than this only match by substring.
const MIN_FUZZY_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOpts {
    pub case_sensitive: bool,
    pub threshold: f64,
}

impl Default for MatchOpts {
    fn default() -> Self { Self { case_sensitive: false, threshold: DEFAULT_THRESHOLD } }
}

/// True when `candidate` contains `query`, or when the query is similar
/// enough (normalized Levenshtein) to the whole candidate or to one of its
/// whitespace-separated words.
pub fn fuzzy_match(query: &str, candidate: &str, opts: MatchOpts) -> bool {
    if query.is_empty() || candidate.is_empty() {
        return false;
    }
    let (q, c) = if opts.case_sensitive {
        (query.to_string(), candidate.to_string())
    } else {
        (query.to_lowercase(), candidate.to_lowercase())
    };
    if c.contains(q.as_str()) {
        return true;
    }
    let q: Vec<char> = q.chars().collect();
    if q.len() < MIN_FUZZY_QUERY_CHARS {
        return false;
    }
    let whole: Vec<char> = c.chars().collect();
    if similarity(&q, &whole) >= opts.threshold {
        return true;
    }
    // A typo in one word of a multi-word value should still find the record.
    c.split_whitespace().any(|w| {
        let w: Vec<char> = w.chars().collect();
        similarity(&q, &w) >= opts.threshold
    })
}

/// `1 - d / max(|a|, |b|)`; 1.0 for two empty inputs.
pub fn similarity(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Classic dynamic-programming edit distance, keeping two rows of the matrix.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
