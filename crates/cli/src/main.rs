use std::path::{Path, PathBuf};
use std::str::FromStr;

use acta_api::Pipeline;
use acta_core::SearchConfig;
use acta_filter::{FilterConfig, FilterEngine, FilterValue};
use acta_persist::{SavedFilterStore, SqliteStore};
use acta_search::{highlight::mark, highlight_indices, SearchEngine, SearchOptions};
use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "actactl", version, about = "Acta list-view search and filters")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fuzzy-search a JSON array of records
    Search {
        /// Path to a JSON array of records
        corpus: PathBuf,
        query: String,
        /// Record fields to search (repeatable)
        #[arg(long = "field", default_value = "title")]
        fields: Vec<String>,
        /// Similarity threshold in [0, 1]
        #[arg(long = "threshold")]
        threshold: Option<f64>,
        #[arg(long = "case-sensitive", action = ArgAction::SetTrue)]
        case_sensitive: bool,
    },
    /// Search then apply typed filters
    Filter {
        corpus: PathBuf,
        /// Path to a JSON array of filter configs
        #[arg(long = "filters")]
        filters: PathBuf,
        #[arg(long = "query", default_value = "")]
        query: String,
        #[arg(long = "field", default_value = "title")]
        fields: Vec<String>,
        /// Filter assignment `id=value` (repeatable)
        #[arg(long = "set")]
        sets: Vec<String>,
        /// Saved filter set to load before applying `--set`
        #[arg(long = "saved")]
        saved: Option<String>,
        #[arg(long = "view", default_value = "default")]
        view: String,
    },
    /// Manage saved filter sets
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SavedCommands {
    /// Save a filter set built from `--set` assignments
    Save {
        name: String,
        #[arg(long = "filters")]
        filters: PathBuf,
        #[arg(long = "set")]
        sets: Vec<String>,
        #[arg(long = "view", default_value = "default")]
        view: String,
    },
    /// List saved filter sets, most recent first
    Ls {
        #[arg(long = "view", default_value = "default")]
        view: String,
    },
    /// Delete a saved filter set
    Rm {
        id: String,
        #[arg(long = "view", default_value = "default")]
        view: String,
    },
}

const DEFAULT_LOG: &str = "info";

/// `ACTA_LOG` when it parses as a filter, `info` otherwise.
fn log_filter(raw: Option<String>) -> tracing_subscriber::EnvFilter {
    let env = raw.unwrap_or_else(|| DEFAULT_LOG.to_string());
    tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG))
}

fn init_tracing() {
    let filter = log_filter(std::env::var("ACTA_LOG").ok());
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("ACTA_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => tracing::info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => tracing::warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            tracing::warn!(addr = %addr, "invalid ACTA_METRICS_ADDR; expected host:port");
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Split `id=value` and parse the value by the filter's declared type.
fn parse_set(configs: &[FilterConfig], assignment: &str) -> Result<(String, FilterValue)> {
    let (id, raw) = assignment.split_once('=').ok_or_else(|| anyhow!("expected id=value, got {:?}", assignment))?;
    let cfg = configs.iter().find(|c| c.id == id).ok_or_else(|| anyhow!("unknown filter {:?}", id))?;
    Ok((id.to_string(), FilterValue::parse(cfg.kind, raw)?))
}

fn label_of(rec: &Value, fields: &[String]) -> String {
    let id = rec.get("id").map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()));
    let text = fields.iter().find_map(|f| rec.get(f).and_then(|v| v.as_str())).unwrap_or("-");
    match id {
        Some(id) => format!("{:<8} {}", id, text),
        None => text.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    init_metrics();
    let cli = Cli::parse();
    let env_cfg = SearchConfig::from_env();

    match cli.command {
        Commands::Search { corpus, query, fields, threshold, case_sensitive } => {
            let records: Vec<Value> = read_json(&corpus)?;
            info!(docs = records.len(), query = %query, "search invoked");
            let mut opts = SearchOptions::from_config(fields.clone(), &env_cfg);
            if let Some(t) = threshold {
                opts.fuzzy_threshold = t.clamp(0.0, 1.0);
            }
            opts.case_sensitive |= case_sensitive;
            let mut eng = SearchEngine::new(records, opts)?;
            eng.set_term(query.clone());
            eng.flush();

            match cli.output {
                Output::Human => {
                    println!("MATCHES ({}/{})", eng.filtered_indices().len(), eng.corpus().len());
                    for rec in eng.filtered_items() {
                        println!("  {}", label_of(rec, &fields));
                    }
                    if !eng.suggestions().is_empty() {
                        println!("SUGGESTIONS");
                        for s in eng.suggestions() {
                            println!("  {}", mark(s, &highlight_indices(&query, s), "[", "]"));
                        }
                    }
                }
                Output::Json => {
                    #[derive(serde::Serialize)]
                    struct Suggestion<'a> { text: &'a str, highlight: Vec<usize> }
                    #[derive(serde::Serialize)]
                    struct Out<'a> { matches: Vec<&'a Value>, suggestions: Vec<Suggestion<'a>> }
                    let out = Out {
                        matches: eng.filtered_items().collect(),
                        suggestions: eng
                            .suggestions()
                            .iter()
                            .map(|s| Suggestion { text: s.as_str(), highlight: highlight_indices(&query, s) })
                            .collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
        }
        Commands::Filter { corpus, filters, query, fields, sets, saved, view } => {
            let records: Vec<Value> = read_json(&corpus)?;
            let configs: Vec<FilterConfig> = read_json(&filters)?;
            info!(docs = records.len(), filters = configs.len(), query = %query, "filter invoked");
            let assignments = sets.iter().map(|s| parse_set(&configs, s)).collect::<Result<Vec<_>>>()?;
            let mut p = Pipeline::new(records, SearchOptions::from_config(fields.clone(), &env_cfg), configs)?;
            if let Some(id) = saved {
                let store = SqliteStore::open_default()?;
                p.restore_saved(store.list(&view)?);
                p.load_saved_filter(&id).with_context(|| format!("loading saved filter {} from view {}", id, view))?;
            }
            for (id, value) in assignments {
                p.update_filter(&id, value)?;
            }
            p.set_term(query);
            p.flush();

            match cli.output {
                Output::Human => {
                    println!("RESULTS ({})", p.len());
                    for rec in p.filtered_items() {
                        println!("  {}", label_of(rec, &fields));
                    }
                    if p.has_active_filters() {
                        let chips: Vec<String> =
                            p.active_filters().iter().map(|a| format!("{}: {}", a.label, a.display_value)).collect();
                        println!("ACTIVE  {}", chips.join(" • "));
                    }
                    for cfg in p.enhanced_configs().iter().filter(|c| c.has_facets()) {
                        let facets: Vec<String> = cfg
                            .options
                            .iter()
                            .map(|o| match o.count {
                                Some(n) => format!("{} ({})", o.label, n),
                                None => o.label.clone(),
                            })
                            .collect();
                        println!("{:<12} {}", cfg.label, facets.join(", "));
                    }
                }
                Output::Json => {
                    let out = serde_json::json!({
                        "items": p.filtered_items().collect::<Vec<_>>(),
                        "activeFilters": p.active_filters(),
                        "filters": p.enhanced_configs(),
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
        }
        Commands::Saved { command } => {
            let store = SqliteStore::open_default()?;
            match command {
                SavedCommands::Save { name, filters, sets, view } => {
                    let configs: Vec<FilterConfig> = read_json(&filters)?;
                    let assignments = sets.iter().map(|s| parse_set(&configs, s)).collect::<Result<Vec<_>>>()?;
                    let mut eng: FilterEngine<Value> = FilterEngine::new(Vec::new(), configs)?;
                    for (id, value) in assignments {
                        eng.update_filter(&id, value)?;
                    }
                    let id = eng.save_current_filters(&name);
                    let entry = eng.saved_filter(&id).ok_or_else(|| anyhow!("saved filter {} vanished", id))?;
                    store.put(&view, entry)?;
                    match cli.output {
                        Output::Human => println!("saved {} ({})", name, id),
                        Output::Json => println!("{}", serde_json::to_string_pretty(entry)?),
                    }
                }
                SavedCommands::Ls { view } => {
                    let entries = store.list(&view)?;
                    match cli.output {
                        Output::Human => {
                            println!("ID                                    NAME                 CREATED");
                            for s in &entries {
                                println!("{:<37} {:<20} {}", s.id, s.name, s.created_at.format("%Y-%m-%d %H:%M"));
                            }
                        }
                        Output::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                    }
                }
                SavedCommands::Rm { id, view } => {
                    if !store.delete(&view, &id)? {
                        return Err(anyhow!("no saved filter {} in view {}", id, view));
                    }
                    if matches!(cli.output, Output::Human) {
                        println!("deleted {}", id);
                    }
                }
            }
        }
    }

    Ok(())
}
