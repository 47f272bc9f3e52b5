//! Acta search: debounced fuzzy text search over an in-memory corpus.
//!
//! `term` follows every keystroke; `debounced_term` trails it by the
//! configured quiet period and is the only input membership, suggestions
//! and history react to. Results are recomputed eagerly whenever the
//! debounced term or the corpus changes.

#![forbid(unsafe_code)]

use std::time::{Duration, Instant};

use acta_core::{ActaResult, Record, SearchConfig};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

pub mod debounce;
pub mod fuzzy;
pub mod highlight;
pub mod history;
pub mod suggest;

pub use debounce::Debouncer;
pub use fuzzy::{fuzzy_match, MatchOpts};
pub use highlight::highlight_indices;
pub use history::SearchHistory;
pub use suggest::suggestions;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Record fields inspected by the search stage and for suggestions.
    pub search_fields: Vec<String>,
    pub debounce: Duration,
    pub case_sensitive: bool,
    pub fuzzy_threshold: f64,
    pub max_suggestions: usize,
    pub history_cap: usize,
}

impl SearchOptions {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(fields, &SearchConfig::default())
    }

    pub fn from_config<I, S>(fields: I, cfg: &SearchConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: fields.into_iter().map(Into::into).collect(),
            debounce: Duration::from_millis(cfg.debounce_ms),
            case_sensitive: cfg.case_sensitive,
            fuzzy_threshold: cfg.fuzzy_threshold,
            max_suggestions: cfg.max_suggestions,
            history_cap: cfg.history_cap,
        }
    }

    fn match_opts(&self) -> MatchOpts {
        MatchOpts { case_sensitive: self.case_sensitive, threshold: self.fuzzy_threshold }
    }
}

/// Search-stage membership: an empty term passes everything, otherwise at
/// least one text field must fuzzy-match.
pub fn record_matches<R: Record>(rec: &R, fields: &[String], term: &str, opts: MatchOpts) -> bool {
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|f| rec.field(f).and_then(|v| v.as_text()).map(|s| fuzzy_match(term, s, opts)).unwrap_or(false))
}

/// Per-view search state. Each list view owns its own engine.
pub struct SearchEngine<R> {
    corpus: Vec<R>,
    opts: SearchOptions,
    term: String,
    debounced_term: String,
    history: SearchHistory,
    suggestions: Vec<String>,
    filtered: Vec<usize>,
    debouncer: Debouncer,
    settled_tx: mpsc::UnboundedSender<String>,
    settled_rx: mpsc::UnboundedReceiver<String>,
}

impl<R: Record> SearchEngine<R> {
    /// Build an engine bound to the current tokio runtime.
    pub fn new(corpus: Vec<R>, opts: SearchOptions) -> ActaResult<Self> {
        Ok(Self::with_debouncer(corpus, opts, Debouncer::current()?))
    }

    pub fn with_handle(corpus: Vec<R>, opts: SearchOptions, handle: Handle) -> Self {
        Self::with_debouncer(corpus, opts, Debouncer::new(handle))
    }

    fn with_debouncer(corpus: Vec<R>, opts: SearchOptions, debouncer: Debouncer) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let history = SearchHistory::with_capacity(opts.history_cap);
        let mut me = Self {
            corpus,
            opts,
            term: String::new(),
            debounced_term: String::new(),
            history,
            suggestions: Vec::new(),
            filtered: Vec::new(),
            debouncer,
            settled_tx,
            settled_rx,
        };
        me.recompute();
        me
    }

    pub fn term(&self) -> &str { &self.term }
    pub fn debounced_term(&self) -> &str { &self.debounced_term }
    pub fn options(&self) -> &SearchOptions { &self.opts }
    pub fn corpus(&self) -> &[R] { &self.corpus }
    pub fn suggestions(&self) -> &[String] { &self.suggestions }
    pub fn history(&self) -> &[String] { self.history.terms() }
    pub fn has_active_search(&self) -> bool { !self.debounced_term.is_empty() }

    /// Indices into [`Self::corpus`] that pass the search stage, in corpus order.
    pub fn filtered_indices(&self) -> &[usize] { &self.filtered }

    pub fn filtered_items(&self) -> impl Iterator<Item = &R> + '_ {
        self.filtered.iter().filter_map(move |i| self.corpus.get(*i))
    }

    /// Record a keystroke. The debounced term follows once input pauses.
    pub fn set_term(&mut self, value: impl Into<String>) {
        self.term = value.into();
        let tx = self.settled_tx.clone();
        self.debouncer.schedule(self.term.clone(), self.opts.debounce, move |t| {
            let _ = tx.send(t);
        });
    }

    /// Apply any settled term without waiting. Returns true if one was applied.
    pub fn pump(&mut self) -> bool {
        let mut last: Option<String> = None;
        while let Ok(t) = self.settled_rx.try_recv() {
            last = Some(t);
        }
        match last {
            Some(t) => { self.apply_settled(t); true }
            None => false,
        }
    }

    /// Wait for the pending debounce to settle and apply it. Returns false
    /// immediately when nothing is pending.
    pub async fn settled(&mut self) -> bool {
        let pending = self.debouncer.is_pending();
        if self.pump() {
            return true;
        }
        if !pending {
            return false;
        }
        match self.settled_rx.recv().await {
            Some(t) => {
                self.apply_settled(t);
                self.pump();
                true
            }
            None => false,
        }
    }

    /// Skip the quiet period and settle the current raw term now.
    pub fn flush(&mut self) {
        self.debouncer.cancel();
        while self.settled_rx.try_recv().is_ok() {}
        let t = self.term.clone();
        self.apply_settled(t);
    }

    pub fn set_corpus(&mut self, corpus: Vec<R>) {
        self.corpus = corpus;
        self.recompute();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn apply_settled(&mut self, term: String) {
        debug!(term = %term, "search: settled");
        if !term.is_empty() {
            self.history.commit(&term);
        }
        self.debounced_term = term;
        self.recompute();
    }

    fn recompute(&mut self) {
        let started = Instant::now();
        let opts = self.opts.match_opts();
        let fields = &self.opts.search_fields;
        let term = self.debounced_term.as_str();
        self.filtered = self
            .corpus
            .iter()
            .enumerate()
            .filter(|(_, r)| record_matches(*r, fields, term, opts))
            .map(|(i, _)| i)
            .collect();
        self.suggestions = suggestions(&self.corpus, fields, term, self.opts.max_suggestions);
        metrics::gauge!("search_corpus_docs", self.corpus.len() as f64);
        metrics::histogram!("search_eval_ms", started.elapsed().as_secs_f64() * 1_000.0);
        debug!(
            total = self.corpus.len(),
            matched = self.filtered.len(),
            suggestions = self.suggestions.len(),
            "search: recomputed"
        );
    }
}
