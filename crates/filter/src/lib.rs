//! Acta filters: typed, conjunctive multi-facet filtering for list views.
//!
//! A [`FilterEngine`] owns the state of every declared filter, the records
//! that pass all of them, the active-filter chips and per-option facet
//! counts. All derived data is recomputed right after each mutating call.
//!
//! Facet counts are scoped to the engine's input corpus (in a pipeline,
//! the search-narrowed records). They are not cross-filtered: selecting
//! one option does not change the counts shown next to the others.

#![forbid(unsafe_code)]

use std::time::Instant;

use acta_core::{ActaError, ActaResult, Record};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub mod config;
pub mod saved;
pub mod value;

pub use config::{FilterConfig, FilterOption};
pub use saved::{FilterState, SavedFilter, SavedFilters};
pub use value::{FilterKind, FilterValue, ALL};

/// A filter currently narrowing the result, for rendering as a chip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub id: String,
    pub label: String,
    pub value: FilterValue,
    pub display_value: String,
}

pub struct FilterEngine<R> {
    configs: Vec<FilterConfig>,
    corpus: Vec<R>,
    state: FilterState,
    filtered: Vec<usize>,
    active: Vec<ActiveFilter>,
    enhanced: Vec<FilterConfig>,
    saved: SavedFilters,
}

impl<R: Record> FilterEngine<R> {
    /// Rejects duplicate ids and defaults whose type differs from the filter's.
    pub fn new(corpus: Vec<R>, configs: Vec<FilterConfig>) -> ActaResult<Self> {
        for (i, cfg) in configs.iter().enumerate() {
            if configs[..i].iter().any(|c| c.id == cfg.id) {
                return Err(ActaError::DuplicateFilter(cfg.id.clone()));
            }
            if let Some(d) = &cfg.default_value {
                check_kind(cfg, d)?;
            }
        }
        let state = configs.iter().map(|c| (c.id.clone(), c.initial_value())).collect();
        let mut me = Self {
            configs,
            corpus,
            state,
            filtered: Vec::new(),
            active: Vec::new(),
            enhanced: Vec::new(),
            saved: SavedFilters::default(),
        };
        me.refresh_facets();
        me.refresh_results();
        Ok(me)
    }

    pub fn configs(&self) -> &[FilterConfig] { &self.configs }
    pub fn corpus(&self) -> &[R] { &self.corpus }
    pub fn filter_state(&self) -> &FilterState { &self.state }
    pub fn active_filters(&self) -> &[ActiveFilter] { &self.active }
    pub fn has_active_filters(&self) -> bool { !self.active.is_empty() }

    /// Declared configs with every non-"all" option's facet count filled in.
    pub fn enhanced_configs(&self) -> &[FilterConfig] { &self.enhanced }

    /// Indices into [`Self::corpus`] passing every filter, in corpus order.
    pub fn filtered_indices(&self) -> &[usize] { &self.filtered }

    pub fn filtered_items(&self) -> impl Iterator<Item = &R> + '_ {
        self.filtered.iter().filter_map(move |i| self.corpus.get(*i))
    }

    /// Replace the stored value of one filter. Unknown ids and values of the
    /// wrong type leave the state untouched and are reported as errors.
    pub fn update_filter(&mut self, id: &str, value: FilterValue) -> ActaResult<()> {
        let cfg = self.config(id)?;
        check_kind(cfg, &value)?;
        self.state.set(id, value);
        self.refresh_results();
        Ok(())
    }

    /// Reset one filter to its type's inactive value.
    pub fn clear_filter(&mut self, id: &str) -> ActaResult<()> {
        let kind = self.config(id)?.kind;
        self.state.set(id, FilterValue::inactive(kind));
        self.refresh_results();
        Ok(())
    }

    pub fn clear_all_filters(&mut self) {
        self.state = self.configs.iter().map(|c| (c.id.clone(), FilterValue::inactive(c.kind))).collect();
        self.refresh_results();
    }

    /// New input corpus, e.g. the output of an upstream search stage.
    pub fn set_corpus(&mut self, corpus: Vec<R>) {
        self.corpus = corpus;
        self.refresh_facets();
        self.refresh_results();
    }

    pub fn saved_filters(&self) -> &[SavedFilter] { self.saved.entries() }
    pub fn saved_filter(&self, id: &str) -> Option<&SavedFilter> { self.saved.get(id) }

    /// Snapshot the full state (active or not) and return the new entry's id.
    pub fn save_current_filters(&mut self, name: &str) -> String {
        let id = self.saved.save(name, &self.state).id.clone();
        metrics::counter!("saved_filters_total", 1u64);
        info!(id = %id, name = %name, "filters: saved");
        id
    }

    /// Replace the whole state with a saved snapshot.
    pub fn load_saved_filter(&mut self, id: &str) -> ActaResult<()> {
        let Some(saved) = self.saved.get(id) else {
            warn!(id = %id, "filters: load of unknown saved filter ignored");
            return Err(ActaError::UnknownSavedFilter(id.to_string()));
        };
        let next: FilterState = self
            .configs
            .iter()
            .map(|c| {
                let v = saved
                    .filters
                    .get(&c.id)
                    .filter(|v| v.kind() == c.kind && v.is_well_formed())
                    .cloned()
                    .unwrap_or_else(|| FilterValue::inactive(c.kind));
                (c.id.clone(), v)
            })
            .collect();
        info!(id = %id, name = %saved.name, "filters: loaded");
        self.state = next;
        self.refresh_results();
        Ok(())
    }

    pub fn delete_saved_filter(&mut self, id: &str) -> ActaResult<()> {
        match self.saved.remove(id) {
            Some(_) => Ok(()),
            None => {
                warn!(id = %id, "filters: delete of unknown saved filter ignored");
                Err(ActaError::UnknownSavedFilter(id.to_string()))
            }
        }
    }

    /// Seed saved filter sets from durable storage.
    pub fn restore_saved(&mut self, entries: Vec<SavedFilter>) {
        self.saved.replace(entries);
    }

    fn config(&self, id: &str) -> ActaResult<&FilterConfig> {
        self.configs.iter().find(|c| c.id == id).ok_or_else(|| {
            warn!(id = %id, "filters: unknown filter id ignored");
            ActaError::UnknownFilter(id.to_string())
        })
    }

    fn passes(&self, rec: &R) -> bool {
        self.configs.iter().all(|cfg| match self.state.get(&cfg.id) {
            Some(v) => v.matches(rec.field(cfg.field_name()).as_ref()),
            None => true,
        })
    }

    fn refresh_results(&mut self) {
        let started = Instant::now();
        let filtered: Vec<usize> = self
            .corpus
            .iter()
            .enumerate()
            .filter(|(_, r)| self.passes(r))
            .map(|(i, _)| i)
            .collect();
        self.filtered = filtered;
        self.active = self
            .configs
            .iter()
            .filter_map(|cfg| {
                let v = self.state.get(&cfg.id)?;
                if v.is_inactive() {
                    return None;
                }
                Some(ActiveFilter {
                    id: cfg.id.clone(),
                    label: cfg.label.clone(),
                    value: v.clone(),
                    display_value: v.display(cfg),
                })
            })
            .collect();
        metrics::histogram!("filter_eval_ms", started.elapsed().as_secs_f64() * 1_000.0);
        debug!(
            total = self.corpus.len(),
            matched = self.filtered.len(),
            active = self.active.len(),
            "filters: recomputed"
        );
    }

    fn refresh_facets(&mut self) {
        let corpus = &self.corpus;
        self.enhanced = self
            .configs
            .iter()
            .map(|cfg| {
                let mut cfg = cfg.clone();
                if cfg.has_facets() {
                    let field = cfg.field_name().to_string();
                    for opt in cfg.options.iter_mut().filter(|o| o.value != ALL) {
                        let n = corpus
                            .iter()
                            .filter(|r| r.field(&field).map(|v| v.contains_str(&opt.value)).unwrap_or(false))
                            .count();
                        opt.count = Some(n);
                    }
                }
                cfg
            })
            .collect();
    }
}

fn check_kind(cfg: &FilterConfig, value: &FilterValue) -> ActaResult<()> {
    if value.kind() != cfg.kind {
        warn!(id = %cfg.id, expected = %cfg.kind, got = %value.kind(), "filters: value of wrong type ignored");
        return Err(ActaError::TypeMismatch { id: cfg.id.clone(), expected: cfg.kind.as_str(), got: value.kind().as_str() });
    }
    if !value.is_well_formed() {
        warn!(id = %cfg.id, value = ?value, "filters: malformed value ignored");
        return Err(ActaError::InvalidValue { kind: cfg.kind.as_str(), input: format!("{:?}", value) });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn types_corpus() -> Vec<serde_json::Value> {
        vec![json!({"type": "Workshop"}), json!({"type": "Workshop"}), json!({"type": "Competition"})]
    }

    fn type_filter() -> FilterConfig {
        FilterConfig::select(
            "type",
            "Type",
            vec![
                FilterOption::new("all", "All types"),
                FilterOption::new("Workshop", "Workshop"),
                FilterOption::new("Competition", "Competition"),
            ],
        )
    }

    #[test]
    fn select_then_clear() {
        let mut eng = FilterEngine::new(types_corpus(), vec![type_filter()]).unwrap();
        eng.update_filter("type", FilterValue::Select("Workshop".into())).unwrap();
        assert_eq!(eng.filtered_indices().len(), 2);
        assert_eq!(eng.active_filters().len(), 1);
        assert_eq!(eng.active_filters()[0].display_value, "Workshop");
        eng.clear_filter("type").unwrap();
        assert_eq!(eng.filtered_indices().len(), 3);
        assert!(eng.active_filters().is_empty());
    }

    #[test]
    fn unknown_id_is_a_reported_no_op() {
        let mut eng = FilterEngine::new(types_corpus(), vec![type_filter()]).unwrap();
        eng.update_filter("type", FilterValue::Select("Competition".into())).unwrap();
        let before = eng.filter_state().clone();
        assert_eq!(
            eng.update_filter("nope", FilterValue::Boolean(true)),
            Err(ActaError::UnknownFilter("nope".into()))
        );
        assert!(eng.clear_filter("nope").is_err());
        assert_eq!(eng.filter_state(), &before);
        assert_eq!(eng.filtered_indices(), &[2]);
    }

    #[test]
    fn wrong_value_type_rejected() {
        let mut eng = FilterEngine::new(types_corpus(), vec![type_filter()]).unwrap();
        let err = eng.update_filter("type", FilterValue::Boolean(true)).unwrap_err();
        assert!(matches!(err, ActaError::TypeMismatch { expected: "select", got: "boolean", .. }));
        assert_eq!(eng.filter_state().get("type"), Some(&FilterValue::Select(ALL.into())));
    }

    #[test]
    fn malformed_range_rejected_and_state_kept() {
        let corpus = vec![json!({"credits": 1}), json!({"credits": 5}), json!({"credits": "n/a"})];
        let credits = || FilterConfig::new("credits", "Credits", FilterKind::Range);
        let mut eng = FilterEngine::new(corpus.clone(), vec![credits()]).unwrap();
        eng.update_filter("credits", FilterValue::Range { min: Some(2.0), max: None }).unwrap();
        let before = eng.filter_state().clone();
        for bad in [
            FilterValue::Range { min: Some(f64::NAN), max: None },
            FilterValue::Range { min: None, max: Some(f64::INFINITY) },
            FilterValue::Range { min: Some(4.0), max: Some(1.0) },
        ] {
            let err = eng.update_filter("credits", bad).unwrap_err();
            assert!(matches!(err, ActaError::InvalidValue { kind: "range", .. }));
        }
        assert_eq!(eng.filter_state(), &before);
        assert_eq!(eng.filtered_indices(), &[1, 2]);
        assert_eq!(eng.active_filters()[0].display_value, "≥2");

        let bad_default = credits().with_default(FilterValue::Range { min: Some(f64::NAN), max: None });
        assert!(matches!(FilterEngine::new(corpus, vec![bad_default]), Err(ActaError::InvalidValue { .. })));
    }

    #[test]
    fn construction_validates_configs() {
        let dup = FilterEngine::new(types_corpus(), vec![type_filter(), type_filter()]);
        assert!(matches!(dup, Err(ActaError::DuplicateFilter(id)) if id == "type"));
        let bad_default = type_filter().with_default(FilterValue::Boolean(true));
        assert!(FilterEngine::new(types_corpus(), vec![bad_default]).is_err());
    }

    #[test]
    fn declared_default_starts_active() {
        let cfg = type_filter().with_default(FilterValue::Select("Competition".into()));
        let mut eng = FilterEngine::new(types_corpus(), vec![cfg]).unwrap();
        assert_eq!(eng.filtered_indices(), &[2]);
        assert_eq!(eng.active_filters().len(), 1);
        eng.clear_all_filters();
        assert_eq!(eng.filtered_indices().len(), 3);
    }

    #[test]
    fn facet_counts_skip_all_and_ignore_own_selection() {
        let mut eng = FilterEngine::new(types_corpus(), vec![type_filter()]).unwrap();
        let counts = |e: &FilterEngine<serde_json::Value>| -> Vec<Option<usize>> {
            e.enhanced_configs()[0].options.iter().map(|o| o.count).collect()
        };
        assert_eq!(counts(&eng), vec![None, Some(2), Some(1)]);
        eng.update_filter("type", FilterValue::Select("Competition".into())).unwrap();
        assert_eq!(counts(&eng), vec![None, Some(2), Some(1)]);
        eng.set_corpus(vec![json!({"type": "Competition"})]);
        assert_eq!(counts(&eng), vec![None, Some(0), Some(1)]);
        assert_eq!(eng.filtered_indices(), &[0]);
        assert!(eng.configs()[0].options.iter().all(|o| o.count.is_none()));
    }

    #[test]
    fn saved_unknown_ids_are_reported() {
        let mut eng = FilterEngine::new(types_corpus(), vec![type_filter()]).unwrap();
        assert!(matches!(eng.load_saved_filter("x"), Err(ActaError::UnknownSavedFilter(_))));
        assert!(matches!(eng.delete_saved_filter("x"), Err(ActaError::UnknownSavedFilter(_))));
        let id = eng.save_current_filters("all");
        assert!(eng.delete_saved_filter(&id).is_ok());
        assert!(eng.saved_filters().is_empty());
    }
}
