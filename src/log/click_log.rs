/// Click-history logging
///
/// Every pixel the user annotates inside a selection is recorded with:
/// - Absolute grid coordinates
/// - The raw (non-normalized) channel value
/// - Timestamp
///
/// The log is append-only for the session and can be exported as:
/// - CSV (`X,Y,Value` header, the shutdown format)
/// - JSON (full session metadata included)

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// One annotated pixel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickRecord {
    /// Absolute grid column
    pub x: usize,
    /// Absolute grid row
    pub y: usize,
    /// Raw channel value at (x, y)
    pub value: f64,
    /// When the click was recorded
    pub timestamp: DateTime<Local>,
}

/// The session's click history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickLog {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub source_file: String,
    entries: Vec<ClickRecord>,
}

impl ClickLog {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            source_file: String::new(),
            entries: Vec::new(),
        }
    }

    /// Set the source file for this session
    pub fn set_source(&mut self, source: &str) {
        self.source_file = source.to_string();
    }

    /// Append a record and return it
    pub fn add_entry(&mut self, x: usize, y: usize, value: f64) -> &ClickRecord {
        self.entries.push(ClickRecord {
            x,
            y,
            value,
            timestamp: Local::now(),
        });
        log::info!("[CLICK {:03}] X: {}, Y: {}, Value: {}", self.entries.len(), x, y, value);
        self.entries.last().expect("just pushed")
    }

    pub fn entries(&self) -> &[ClickRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export as CSV with the `X,Y,Value` header
    pub fn to_csv(&self) -> String {
        let mut out = String::from("X,Y,Value\n");
        for rec in &self.entries {
            out.push_str(&format!("{},{},{}\n", rec.x, rec.y, rec.value));
        }
        out
    }

    /// Export as JSON (includes session metadata)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// Save as CSV at an explicit path
    pub fn save_csv(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_csv())
    }

    /// Save as JSON at an explicit path
    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_json())
    }

    /// The shutdown export filename for a given source stem and time:
    /// `analysis_<stem>_<YYYYMMDD_HHMMSS>.csv`. Second-granularity, so two
    /// exports within the same second would collide — accepted limitation.
    pub fn csv_filename(stem: &str, when: DateTime<Local>) -> String {
        format!("analysis_{}_{}.csv", stem, when.format("%Y%m%d_%H%M%S"))
    }

    /// Write the CSV into the working directory under the timestamped
    /// filename and return the path written.
    pub fn export_csv_auto(&self, stem: &str) -> io::Result<PathBuf> {
        let path = PathBuf::from(Self::csv_filename(stem, Local::now()));
        self.save_csv(&path)?;
        log::info!("Click log exported: {}", path.display());
        Ok(path)
    }
}

impl Default for ClickLog {
    fn default() -> Self {
        Self::new()
    }
}
