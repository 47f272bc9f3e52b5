use acta_core::{Activity, ActivityStatus};
use acta_filter::{FilterConfig, FilterEngine, FilterKind, FilterOption, FilterValue};
use chrono::NaiveDate;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn activity(id: &str, kind: &str, status: ActivityStatus, d: u32, credits: f64, tags: &[&str], verified: bool) -> Activity {
    Activity {
        id: id.to_string(),
        title: format!("{} {}", kind, id),
        description: String::new(),
        kind: kind.to_string(),
        status,
        student: "s".to_string(),
        department: "CSE".to_string(),
        date: day(d),
        credits,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        verified,
    }
}

fn corpus() -> Vec<Activity> {
    use ActivityStatus::*;
    vec![
        activity("1", "Workshop", Pending, 1, 1.0, &["web"], false),
        activity("2", "Workshop", Approved, 2, 2.0, &["web", "ml"], true),
        activity("3", "Competition", Pending, 2, 4.0, &["ml"], true),
        activity("4", "Internship", Rejected, 5, 6.0, &[], false),
    ]
}

fn configs() -> Vec<FilterConfig> {
    vec![
        FilterConfig::select(
            "status",
            "Status",
            vec![
                FilterOption::new("all", "All"),
                FilterOption::new("pending", "Pending review"),
                FilterOption::new("approved", "Approved"),
                FilterOption::new("rejected", "Rejected"),
            ],
        ),
        FilterConfig::select(
            "type",
            "Type",
            vec![
                FilterOption::new("all", "All"),
                FilterOption::new("Workshop", "Workshop"),
                FilterOption::new("Competition", "Competition"),
            ],
        ),
        FilterConfig::multiselect("tags", "Tags", vec![FilterOption::new("web", "Web"), FilterOption::new("ml", "Machine learning")]),
        FilterConfig::new("verified", "Verified only", FilterKind::Boolean),
        FilterConfig::new("on", "Date", FilterKind::Date).with_field("date"),
        FilterConfig::new("credits", "Credits", FilterKind::Range),
    ]
}

fn ids(eng: &FilterEngine<Activity>) -> Vec<&str> {
    eng.filtered_items().map(|a| a.id.as_str()).collect()
}

fn select(v: &str) -> FilterValue {
    FilterValue::Select(v.to_string())
}

#[test]
fn filters_combine_conjunctively() {
    let mut eng = FilterEngine::new(corpus(), configs()).unwrap();
    assert_eq!(ids(&eng), vec!["1", "2", "3", "4"]);
    eng.update_filter("status", select("pending")).unwrap();
    assert_eq!(ids(&eng), vec!["1", "3"]);
    eng.update_filter("verified", FilterValue::Boolean(true)).unwrap();
    assert_eq!(ids(&eng), vec!["3"]);
    eng.update_filter("credits", FilterValue::Range { min: None, max: Some(3.0) }).unwrap();
    assert!(ids(&eng).is_empty());
    let chips: Vec<(&str, &str)> =
        eng.active_filters().iter().map(|a| (a.id.as_str(), a.display_value.as_str())).collect();
    assert_eq!(chips, vec![("status", "Pending review"), ("verified", "Yes"), ("credits", "≤3")]);
}

#[test]
fn multiselect_date_and_range() {
    let mut eng = FilterEngine::new(corpus(), configs()).unwrap();
    eng.update_filter("tags", FilterValue::parse(FilterKind::MultiSelect, "ml").unwrap()).unwrap();
    assert_eq!(ids(&eng), vec!["2", "3"]);
    eng.update_filter("on", FilterValue::Date(Some(day(2)))).unwrap();
    assert_eq!(ids(&eng), vec!["2", "3"]);
    eng.update_filter("credits", FilterValue::Range { min: Some(3.0), max: None }).unwrap();
    assert_eq!(ids(&eng), vec!["3"]);

    let chips: Vec<(&str, &str)> =
        eng.active_filters().iter().map(|a| (a.id.as_str(), a.display_value.as_str())).collect();
    assert_eq!(chips, vec![("tags", "Machine learning"), ("on", "Mar 2, 2024"), ("credits", "≥3")]);

    eng.update_filter("tags", FilterValue::parse(FilterKind::MultiSelect, "ml,web").unwrap()).unwrap();
    eng.update_filter("credits", FilterValue::Range { min: Some(1.5), max: Some(4.0) }).unwrap();
    let chips: Vec<&str> = eng.active_filters().iter().map(|a| a.display_value.as_str()).collect();
    assert_eq!(chips, vec!["2 selected", "Mar 2, 2024", "1.5–4"]);
}

#[test]
fn active_count_tracks_non_default_values() {
    let mut eng = FilterEngine::new(corpus(), configs()).unwrap();
    assert_eq!(eng.active_filters().len(), 0);
    eng.update_filter("status", select("approved")).unwrap();
    eng.update_filter("verified", FilterValue::Boolean(false)).unwrap();
    eng.update_filter("credits", FilterValue::Range { min: None, max: None }).unwrap();
    assert_eq!(eng.active_filters().len(), 1);
    assert_eq!(eng.active_filters()[0].display_value, "Approved");
    let non_default = eng.filter_state().iter().filter(|(_, v)| !v.is_inactive()).count();
    assert_eq!(non_default, eng.active_filters().len());
    assert_eq!(eng.filter_state().len(), configs().len());
}

#[test]
fn clear_all_restores_full_corpus() {
    let mut eng = FilterEngine::new(corpus(), configs()).unwrap();
    eng.update_filter("status", select("rejected")).unwrap();
    eng.update_filter("tags", FilterValue::parse(FilterKind::MultiSelect, "web").unwrap()).unwrap();
    assert!(ids(&eng).is_empty());
    eng.clear_all_filters();
    assert_eq!(ids(&eng), vec!["1", "2", "3", "4"]);
    assert!(!eng.has_active_filters());
}

#[test]
fn save_then_load_round_trips_whole_state() {
    let mut eng = FilterEngine::new(corpus(), configs()).unwrap();
    eng.update_filter("status", select("pending")).unwrap();
    eng.update_filter("type", select("Workshop")).unwrap();
    let before = eng.filter_state().clone();
    let id = eng.save_current_filters("myview");
    assert_eq!(eng.saved_filters().len(), 1);
    assert_eq!(eng.saved_filters()[0].name, "myview");
    assert_eq!(eng.saved_filters()[0].filters.len(), configs().len());

    eng.update_filter("status", select("approved")).unwrap();
    eng.update_filter("verified", FilterValue::Boolean(true)).unwrap();
    eng.clear_filter("type").unwrap();

    eng.load_saved_filter(&id).unwrap();
    assert_eq!(eng.filter_state(), &before);
    assert_eq!(eng.filter_state().get("status"), Some(&select("pending")));
    assert_eq!(eng.filter_state().get("type"), Some(&select("Workshop")));
    assert_eq!(eng.filter_state().get("verified"), Some(&FilterValue::Boolean(false)));
    assert_eq!(ids(&eng), vec!["1"]);
}

#[test]
fn saved_list_is_most_recent_first() {
    let mut eng = FilterEngine::new(corpus(), configs()).unwrap();
    let first = eng.save_current_filters("same");
    let second = eng.save_current_filters("same");
    let listed: Vec<&str> = eng.saved_filters().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(listed, vec![second.as_str(), first.as_str()]);
}

#[test]
fn facet_counts_per_option() {
    let eng = FilterEngine::new(corpus(), configs()).unwrap();
    let find = |id: &str| eng.enhanced_configs().iter().find(|c| c.id == id).unwrap().clone();
    let status: Vec<(String, Option<usize>)> = find("status").options.into_iter().map(|o| (o.value, o.count)).collect();
    assert_eq!(
        status,
        vec![
            ("all".to_string(), None),
            ("pending".to_string(), Some(2)),
            ("approved".to_string(), Some(1)),
            ("rejected".to_string(), Some(1)),
        ]
    );
    let tags: Vec<Option<usize>> = find("tags").options.iter().map(|o| o.count).collect();
    assert_eq!(tags, vec![Some(2), Some(2)]);
    assert!(find("credits").options.is_empty());
}
