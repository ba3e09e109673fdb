use crate::scan::model::SearchResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Most entries the log retains.
pub const HISTORY_LIMIT: usize = 15;

/// One recorded scan, keyed by its raw query string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub query: String,
    pub recorded_at: String,
    pub result: SearchResult,
}

/// Capped, most-recent-first, query-deduplicated scan log.
///
/// Owned entirely by the caller side; the scan pipeline itself never reads
/// or writes it.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanHistory {
    entries: Vec<HistoryEntry>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the log from disk; a missing file yields an empty log.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&content).context("Failed to parse history file")?;
        Ok(Self { entries })
    }

    /// Record one scan: replaces any earlier entry with the same query,
    /// prepends, and truncates to the cap.
    pub fn record(&mut self, query: impl Into<String>, result: SearchResult) {
        let query = query.into();
        self.entries.retain(|e| e.query != query);
        self.entries.insert(
            0,
            HistoryEntry {
                query,
                recorded_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                result,
            },
        );
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Serialize the log as an ordered JSON list.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize history")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write history file: {}", path.display()))?;
        Ok(())
    }
}
