//! Acta persistence: saved filter sets in SQLite, keyed by list view.
//! Engines stay session-scoped; frontends opt in to durability here.

#![forbid(unsafe_code)]

use std::sync::{Mutex, MutexGuard};

use acta_filter::{FilterState, SavedFilter};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use metrics::histogram;
use tracing::debug;

pub trait SavedFilterStore {
    fn put(&self, view: &str, saved: &SavedFilter) -> Result<()>;
    /// Most recent first.
    fn list(&self, view: &str) -> Result<Vec<SavedFilter>>;
    /// Returns false when nothing matched.
    fn delete(&self, view: &str, id: &str) -> Result<bool>;
}

/// SQLite-backed store. Simple, synchronous.
pub struct SqliteStore {
    db: Mutex<rusqlite::Connection>,
}

impl SqliteStore {
    pub fn open_default() -> Result<Self> {
        let path = std::env::var("ACTA_DB_PATH").unwrap_or_else(|_| default_db_path());
        Self::open(&path)
    }

    pub fn open(path: &str) -> Result<Self> {
        let started = std::time::Instant::now();
        let db = rusqlite::Connection::open(path).with_context(|| format!("opening sqlite db at {}", path))?;
        db.pragma_update(None, "journal_mode", "WAL").ok();
        db.pragma_update(None, "synchronous", "NORMAL").ok();
        db.execute(
            "CREATE TABLE IF NOT EXISTS saved_filters (
                view       TEXT NOT NULL,
                id         TEXT NOT NULL,
                name       TEXT NOT NULL,
                filters    TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (view, id)
            )",
            [],
        )
        .context("creating saved_filters table")?;
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_saved_filters_view_created ON saved_filters(view, created_at DESC)",
            [],
        )
        .ok();
        let me = Self { db: Mutex::new(db) };
        histogram!("persist_open_ms", started.elapsed().as_secs_f64() * 1000.0);
        Ok(me)
    }

    fn conn(&self) -> Result<MutexGuard<'_, rusqlite::Connection>> {
        self.db.lock().map_err(|_| anyhow!("sqlite connection mutex poisoned"))
    }
}

impl SavedFilterStore for SqliteStore {
    fn put(&self, view: &str, saved: &SavedFilter) -> Result<()> {
        let started = std::time::Instant::now();
        let filters = serde_json::to_string(&saved.filters).context("encoding filter state")?;
        self.conn()?
            .execute(
                "INSERT OR REPLACE INTO saved_filters(view, id, name, filters, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                (view, &saved.id, &saved.name, &filters, saved.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            )
            .with_context(|| format!("storing saved filter {}", saved.id))?;
        histogram!("persist_put_ms", started.elapsed().as_secs_f64() * 1000.0);
        debug!(view, id = %saved.id, "persist: saved filter stored");
        Ok(())
    }

    fn list(&self, view: &str) -> Result<Vec<SavedFilter>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, name, filters, created_at FROM saved_filters WHERE view = ?1 ORDER BY created_at DESC, rowid DESC",
        )?;
        let mut rows = stmt.query([view])?;
        let mut out: Vec<SavedFilter> = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let name: String = row.get(1)?;
            let filters: String = row.get(2)?;
            let created_at: String = row.get(3)?;
            let filters: FilterState =
                serde_json::from_str(&filters).with_context(|| format!("decoding filters of {}", id))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("decoding created_at of {}", id))?
                .with_timezone(&Utc);
            out.push(SavedFilter { id, name, filters, created_at });
        }
        Ok(out)
    }

    fn delete(&self, view: &str, id: &str) -> Result<bool> {
        let n = self
            .conn()?
            .execute("DELETE FROM saved_filters WHERE view = ?1 AND id = ?2", [view, id])
            .with_context(|| format!("deleting saved filter {}", id))?;
        Ok(n > 0)
    }
}

fn default_db_path() -> String {
    if let Some(home) = std::env::var_os("HOME") {
        let mut p = std::path::PathBuf::from(home);
        p.push(".acta");
        let _ = std::fs::create_dir_all(&p);
        p.push("acta.db");
        return p.to_string_lossy().to_string();
    }
    "acta.db".to_string()
}
