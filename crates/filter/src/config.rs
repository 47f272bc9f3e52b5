use serde::{Deserialize, Serialize};

use crate::value::{FilterKind, FilterValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    /// Facet count; filled in by the engine, `None` in declared configs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into(), count: None }
    }
}

/// A declared filter for one list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// Record field read by the predicate; defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FilterValue>,
}

impl FilterConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self { id: id.into(), label: label.into(), kind, field: None, options: Vec::new(), default_value: None }
    }

    pub fn select(id: impl Into<String>, label: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self { options, ..Self::new(id, label, FilterKind::Select) }
    }

    pub fn multiselect(id: impl Into<String>, label: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self { options, ..Self::new(id, label, FilterKind::MultiSelect) }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_default(mut self, value: FilterValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.id)
    }

    /// Value the filter starts with: the declared default, else inactive.
    pub fn initial_value(&self) -> FilterValue {
        self.default_value.clone().unwrap_or_else(|| FilterValue::inactive(self.kind))
    }

    /// Label for an option value; the raw value when no option declares it.
    pub fn option_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.options.iter().find(|o| o.value == value).map(|o| o.label.as_str()).unwrap_or(value)
    }

    pub fn has_facets(&self) -> bool {
        matches!(self.kind, FilterKind::Select | FilterKind::MultiSelect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_dashboard_config() {
        let raw = serde_json::json!([
            {"id": "status", "label": "Status", "type": "select",
             "options": [{"value": "all", "label": "All"}, {"value": "pending", "label": "Pending"}]},
            {"id": "tags", "label": "Tags", "type": "multiselect", "field": "tags"},
            {"id": "credits", "label": "Credits", "type": "range",
             "defaultValue": {"type": "range", "value": {"min": 1.0, "max": null}}}
        ]);
        let cfgs: Vec<FilterConfig> = serde_json::from_value(raw).unwrap();
        assert_eq!(cfgs[0].kind, FilterKind::Select);
        assert_eq!(cfgs[0].option_label("pending"), "Pending");
        assert_eq!(cfgs[0].option_label("other"), "other");
        assert_eq!(cfgs[0].field_name(), "status");
        assert_eq!(cfgs[1].kind, FilterKind::MultiSelect);
        assert_eq!(cfgs[2].initial_value(), FilterValue::Range { min: Some(1.0), max: None });
        assert_eq!(cfgs[1].initial_value(), FilterValue::inactive(FilterKind::MultiSelect));
    }
}
