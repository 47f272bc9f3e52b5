use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_CAP: usize = 10;

/// Bounded, de-duplicated list of committed search terms in first-commit
/// order. When full, the oldest term is evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    terms: Vec<String>,
    cap: usize,
}

impl Default for SearchHistory {
    fn default() -> Self { Self::with_capacity(DEFAULT_HISTORY_CAP) }
}

impl SearchHistory {
    pub fn with_capacity(cap: usize) -> Self {
        Self { terms: Vec::new(), cap }
    }

    /// Record a committed term. Empty terms are ignored and a term already
    /// present keeps its position. Returns whether the list changed.
    pub fn commit(&mut self, term: &str) -> bool {
        if term.is_empty() || self.cap == 0 || self.terms.iter().any(|t| t == term) {
            return false;
        }
        self.terms.push(term.to_string());
        if self.terms.len() > self.cap {
            let excess = self.terms.len() - self.cap;
            self.terms.drain(..excess);
        }
        true
    }

    pub fn terms(&self) -> &[String] { &self.terms }
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn clear(&mut self) { self.terms.clear(); }
}
