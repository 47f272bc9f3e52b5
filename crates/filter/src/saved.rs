//! Named snapshots of a complete filter state.

use std::collections::btree_map;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::FilterValue;

/// Current value of every configured filter, keyed by filter id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, FilterValue>);

impl FilterState {
    pub fn get(&self, id: &str) -> Option<&FilterValue> { self.0.get(id) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> btree_map::Iter<'_, String, FilterValue> { self.0.iter() }

    pub(crate) fn set(&mut self, id: &str, value: FilterValue) {
        self.0.insert(id.to_string(), value);
    }
}

impl FromIterator<(String, FilterValue)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    pub filters: FilterState,
    pub created_at: DateTime<Utc>,
}

/// Saved filter sets, most recent first.
#[derive(Debug, Clone, Default)]
pub struct SavedFilters {
    entries: Vec<SavedFilter>,
}

impl SavedFilters {
    pub fn entries(&self) -> &[SavedFilter] { &self.entries }

    pub fn get(&self, id: &str) -> Option<&SavedFilter> {
        self.entries.iter().find(|s| s.id == id)
    }

    /// Snapshot `state` under `name`; returns the new entry.
    pub fn save(&mut self, name: &str, state: &FilterState) -> &SavedFilter {
        let entry = SavedFilter {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            filters: state.clone(),
            created_at: Utc::now(),
        };
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn remove(&mut self, id: &str) -> Option<SavedFilter> {
        let pos = self.entries.iter().position(|s| s.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// Replace all entries, e.g. from durable storage.
    pub fn replace(&mut self, mut entries: Vec<SavedFilter>) {
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.entries = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state(pairs: &[(&str, &str)]) -> FilterState {
        pairs.iter().map(|(k, v)| (k.to_string(), FilterValue::Select(v.to_string()))).collect()
    }

    #[test]
    fn save_prepends_and_ids_are_unique() {
        let mut saved = SavedFilters::default();
        let a = saved.save("mine", &state(&[("status", "pending")])).id.clone();
        let b = saved.save("mine", &state(&[("status", "approved")])).id.clone();
        assert_ne!(a, b);
        assert_eq!(saved.entries()[0].id, b);
        assert_eq!(saved.entries()[1].id, a);
        assert_eq!(saved.get(&a).map(|s| s.name.as_str()), Some("mine"));
        assert!(saved.remove(&a).is_some());
        assert!(saved.remove(&a).is_none());
        assert_eq!(saved.entries().len(), 1);
    }

    #[test]
    fn replace_orders_newest_first() {
        let at = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let mk = |id: &str, d| SavedFilter { id: id.into(), name: id.into(), filters: FilterState::default(), created_at: at(d) };
        let mut saved = SavedFilters::default();
        saved.replace(vec![mk("old", 1), mk("new", 3), mk("mid", 2)]);
        let ids: Vec<&str> = saved.entries().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
