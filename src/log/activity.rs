/// Session activity log
///
/// Every user-visible chart operation (loads, deletions, scale changes,
/// crosshair and view toggles) is recorded in order with a timestamp. The
/// log can be viewed in the app and exported as plain text or JSON.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// One recorded operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 1-based position in the session
    pub sequence: usize,
    pub timestamp: DateTime<Local>,
    pub operation: String,
    pub description: String,
}

impl LogEntry {
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}",
            self.sequence,
            self.timestamp.format("%H:%M:%S"),
            self.operation,
            self.description
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub software_version: String,
    pub entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, operation: &str, description: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(LogEntry {
            sequence: seq,
            timestamp: Local::now(),
            operation: operation.to_string(),
            description: description.to_string(),
        });
        log::info!("[{:03}] {}: {}", seq, operation, description);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entries first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev().take(count)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("SIMPSON-view activity log\n");
        out.push_str(&format!("Session:  {}\n", self.session_id));
        out.push_str(&format!(
            "Started:  {}\n",
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("Version:  {}\n", self.software_version));
        out.push_str(&format!("Entries:  {}\n\n", self.entries.len()));
        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    pub fn save_text(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_text())
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_sequential() {
        let mut log = ActivityLog::new();
        assert!(log.is_empty());
        log.record("Import", "a.spe (2048 points)");
        log.record("Delete", "a.spe");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[0].sequence, 1);
        assert_eq!(log.entries[1].sequence, 2);
        assert_eq!(log.recent(1).next().unwrap().operation, "Delete");
    }

    #[test]
    fn test_text_export() {
        let mut log = ActivityLog::new();
        log.record("Set scale", "a.spe x 2.5");
        let text = log.to_text();
        assert!(text.contains(&log.session_id));
        assert!(text.contains("Set scale | a.spe x 2.5"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut log = ActivityLog::new();
        log.record("Crosshair", "on");
        let parsed: ActivityLog = serde_json::from_str(&log.to_json()).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.session_id, log.session_id);
    }
}
