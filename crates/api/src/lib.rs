//! Acta list-view pipeline (in-process).
//!
//! corpus → search stage → filter stage → consumer. Frontends (CLI, UI
//! bindings) depend on this crate rather than wiring the stages by hand.
//! Search output is handed to the filter stage whenever the debounced term
//! settles or the corpus is replaced; filter mutations recompute only the
//! filter stage.

#![forbid(unsafe_code)]

use acta_core::{ActaResult, Record};
use acta_filter::{ActiveFilter, FilterConfig, FilterEngine, FilterState, FilterValue, SavedFilter};
use acta_search::{SearchEngine, SearchOptions};
use tokio::runtime::Handle;
use tracing::debug;

pub use acta_core::{ActaError, SearchConfig};
pub use acta_filter as filter;
pub use acta_search as search;

pub struct Pipeline<R> {
    search: SearchEngine<R>,
    filter: FilterEngine<R>,
}

impl<R: Record + Clone> Pipeline<R> {
    /// Build a pipeline bound to the current tokio runtime.
    pub fn new(corpus: Vec<R>, opts: SearchOptions, filters: Vec<FilterConfig>) -> ActaResult<Self> {
        let search = SearchEngine::new(corpus, opts)?;
        Self::assemble(search, filters)
    }

    pub fn with_handle(corpus: Vec<R>, opts: SearchOptions, filters: Vec<FilterConfig>, handle: Handle) -> ActaResult<Self> {
        Self::assemble(SearchEngine::with_handle(corpus, opts, handle), filters)
    }

    fn assemble(search: SearchEngine<R>, filters: Vec<FilterConfig>) -> ActaResult<Self> {
        let narrowed: Vec<R> = search.filtered_items().cloned().collect();
        let filter = FilterEngine::new(narrowed, filters)?;
        Ok(Self { search, filter })
    }

    pub fn search(&self) -> &SearchEngine<R> { &self.search }
    pub fn filter(&self) -> &FilterEngine<R> { &self.filter }

    // search stage

    pub fn term(&self) -> &str { self.search.term() }
    pub fn debounced_term(&self) -> &str { self.search.debounced_term() }
    pub fn suggestions(&self) -> &[String] { self.search.suggestions() }
    pub fn history(&self) -> &[String] { self.search.history() }
    pub fn has_active_search(&self) -> bool { self.search.has_active_search() }

    pub fn set_term(&mut self, value: impl Into<String>) {
        self.search.set_term(value);
    }

    /// Apply a settled term, if any, and feed the filter stage.
    pub fn pump(&mut self) -> bool {
        let applied = self.search.pump();
        if applied {
            self.feed_filter();
        }
        applied
    }

    pub async fn settled(&mut self) -> bool {
        let applied = self.search.settled().await;
        if applied {
            self.feed_filter();
        }
        applied
    }

    pub fn flush(&mut self) {
        self.search.flush();
        self.feed_filter();
    }

    pub fn clear_history(&mut self) {
        self.search.clear_history();
    }

    pub fn set_corpus(&mut self, corpus: Vec<R>) {
        self.search.set_corpus(corpus);
        self.feed_filter();
    }

    // filter stage

    pub fn filter_state(&self) -> &FilterState { self.filter.filter_state() }
    pub fn active_filters(&self) -> &[ActiveFilter] { self.filter.active_filters() }
    pub fn has_active_filters(&self) -> bool { self.filter.has_active_filters() }
    pub fn enhanced_configs(&self) -> &[FilterConfig] { self.filter.enhanced_configs() }
    pub fn saved_filters(&self) -> &[SavedFilter] { self.filter.saved_filters() }

    pub fn update_filter(&mut self, id: &str, value: FilterValue) -> ActaResult<()> {
        self.filter.update_filter(id, value)
    }

    pub fn clear_filter(&mut self, id: &str) -> ActaResult<()> {
        self.filter.clear_filter(id)
    }

    pub fn clear_all_filters(&mut self) {
        self.filter.clear_all_filters();
    }

    pub fn save_current_filters(&mut self, name: &str) -> String {
        self.filter.save_current_filters(name)
    }

    pub fn load_saved_filter(&mut self, id: &str) -> ActaResult<()> {
        self.filter.load_saved_filter(id)
    }

    pub fn delete_saved_filter(&mut self, id: &str) -> ActaResult<()> {
        self.filter.delete_saved_filter(id)
    }

    pub fn restore_saved(&mut self, entries: Vec<SavedFilter>) {
        self.filter.restore_saved(entries);
    }

    /// Records passing both stages, in corpus order.
    pub fn filtered_items(&self) -> impl Iterator<Item = &R> + '_ {
        self.filter.filtered_items()
    }

    pub fn len(&self) -> usize { self.filter.filtered_indices().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn feed_filter(&mut self) {
        let narrowed: Vec<R> = self.search.filtered_items().cloned().collect();
        debug!(searched = narrowed.len(), total = self.search.corpus().len(), "pipeline: search output to filters");
        metrics::counter!("pipeline_feeds_total", 1u64);
        self.filter.set_corpus(narrowed);
    }
}
