//! Shared utilities for command implementations
//!
//! This module contains:
//! - `Session` - Loaded snapshot, thresholds and evaluation instant
//! - `resolve_now` - Parse `--now` or fall back to the local clock
//! - `print_analysis` - Render an analysis as text or JSON

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use fincoach_core::{Analysis, AnalysisContext, Config, Snapshot, Status};
use serde::Serialize;
use tracing::debug;

pub const RULE: &str = "   ─────────────────────────────────────────────────────────────";

/// Everything an analysis command needs
pub struct Session {
    pub snapshot: Snapshot,
    pub config: Config,
    pub now: NaiveDateTime,
    pub json: bool,
}

impl Session {
    pub fn open(data: &Path, config: Option<&Path>, now: NaiveDateTime, json: bool) -> Result<Self> {
        let snapshot = Snapshot::load(data)
            .with_context(|| format!("Failed to load snapshot {}", data.display()))?;
        let config = Config::load(config).context("Failed to load config")?;

        debug!(
            transactions = snapshot.transactions.len(),
            goals = snapshot.goals.len(),
            jars = snapshot.jars.len(),
            now = %now,
            "Snapshot loaded"
        );

        Ok(Self::new(snapshot, config, now, json))
    }

    pub fn new(snapshot: Snapshot, config: Config, now: NaiveDateTime, json: bool) -> Self {
        Self {
            snapshot,
            config,
            now,
            json,
        }
    }

    pub fn ctx(&self) -> AnalysisContext<'_> {
        AnalysisContext::from_snapshot(&self.snapshot, self.now)
    }
}

/// Parse `--now`, or read the local clock when it is absent
pub fn resolve_now(arg: Option<&str>) -> Result<NaiveDateTime> {
    let Some(s) = arg else {
        return Ok(chrono::Local::now().naive_local());
    };

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .with_context(|| format!("Invalid --now '{}' (use YYYY-MM-DDTHH:MM:SS)", s))
}

/// Load the snapshot at `path`, or start an empty one if it does not exist yet
pub fn load_or_default(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        debug!(path = %path.display(), "No snapshot yet, starting empty");
        return Ok(Snapshot::default());
    }
    Snapshot::load(path).with_context(|| format!("Failed to load snapshot {}", path.display()))
}

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✅",
        Status::Warning => "⚠️ ",
        Status::Error => "❌",
        Status::InsufficientData => "📉",
        Status::NoData => "📭",
    }
}

/// Print an analysis: pretty JSON with `--json`, else a titled block with
/// `render` drawing the payload
pub fn print_analysis<T: Serialize>(
    json: bool,
    title: &str,
    analysis: &Analysis<T>,
    render: impl FnOnce(&T),
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
        return Ok(());
    }

    println!();
    println!("{}", title);
    println!("{}", RULE);

    if let Some(data) = analysis.data() {
        render(data);
    }
    if let Some(message) = &analysis.message {
        println!("   {} {}", status_icon(analysis.status), message);
    }
    if let Some(recommendation) = &analysis.recommendation {
        println!("   💡 {}", recommendation);
    }

    println!();
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}
