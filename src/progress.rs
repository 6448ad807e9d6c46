//! Harvest progress reporting.
//!
//! Reports observable progress during a harvest run — when it started,
//! each page as it is fetched, records that were skipped, and the elapsed
//! time at the end. Progress is emitted on **stderr** so stdout remains
//! parseable for scripts. None of this is part of the functional contract;
//! the reporter is injected and can be swapped or disabled.

use std::io::Write;

use chrono::{DateTime, Utc};

/// A single progress event during a harvest.
#[derive(Clone, Debug)]
pub enum HarvestEvent {
    /// The first request is about to be issued.
    Started { endpoint: String, at: DateTime<Utc> },
    /// A page was fetched and its records classified.
    PageFetched {
        page: u64,
        records: usize,
        total: u64,
    },
    /// A record arrived without a `data` payload and was skipped.
    MissingData { uri: Option<String> },
    /// A record's payload failed to parse as JSON-LD and was skipped.
    ParseFailed { uri: Option<String>, error: String },
    /// Pagination terminated; the report is complete.
    Finished { total: u64, elapsed_secs: f64 },
}

/// Reports harvest progress. Implementations write to stderr (human or JSON).
pub trait HarvestReporter: Send + Sync {
    /// Emit a progress event. Called from the harvest loop and classifier.
    fn report(&self, event: HarvestEvent);
}

/// Human-friendly progress on stderr.
pub struct StderrProgress;

impl HarvestReporter for StderrProgress {
    fn report(&self, event: HarvestEvent) {
        let line = match &event {
            HarvestEvent::Started { endpoint, at } => {
                format!("harvest {}  started {}\n", endpoint, at.format("%Y-%m-%d %H:%M:%S UTC"))
            }
            HarvestEvent::PageFetched {
                page,
                records,
                total,
            } => {
                format!(
                    "harvest page {}  {} records  ({} with data)\n",
                    page, records, total
                )
            }
            HarvestEvent::MissingData { uri } => {
                format!("skip {}  missing data\n", uri.as_deref().unwrap_or("<no uri>"))
            }
            HarvestEvent::ParseFailed { uri, error } => {
                format!(
                    "skip {}  parse failed: {}\n",
                    uri.as_deref().unwrap_or("<no uri>"),
                    error
                )
            }
            HarvestEvent::Finished {
                total,
                elapsed_secs,
            } => {
                format!(
                    "harvest finished  {} records with data in {:.1}s\n",
                    total, elapsed_secs
                )
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl HarvestReporter for JsonProgress {
    fn report(&self, event: HarvestEvent) {
        let obj = match &event {
            HarvestEvent::Started { endpoint, at } => serde_json::json!({
                "event": "started",
                "endpoint": endpoint,
                "at": at.to_rfc3339()
            }),
            HarvestEvent::PageFetched {
                page,
                records,
                total,
            } => serde_json::json!({
                "event": "page",
                "page": page,
                "records": records,
                "total": total
            }),
            HarvestEvent::MissingData { uri } => serde_json::json!({
                "event": "missing_data",
                "uri": uri
            }),
            HarvestEvent::ParseFailed { uri, error } => serde_json::json!({
                "event": "parse_failed",
                "uri": uri,
                "error": error
            }),
            HarvestEvent::Finished {
                total,
                elapsed_secs,
            } => serde_json::json!({
                "event": "finished",
                "total": total,
                "elapsed_secs": elapsed_secs
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl HarvestReporter for NoProgress {
    fn report(&self, _event: HarvestEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse a mode name as used in config files and `--progress`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "off" => Some(ProgressMode::Off),
            "human" => Some(ProgressMode::Human),
            "json" => Some(ProgressMode::Json),
            "auto" => Some(Self::default_for_tty()),
            _ => None,
        }
    }

    /// Build a reporter for this mode. Caller passes it to the harvest.
    pub fn reporter(&self) -> Box<dyn HarvestReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
