//! Document store: load/save/backup of the training document.
//!
//! One JSON file, whole-document replacement on every save. Two concurrent
//! saves race; the later write wins in full. There is no merge, no
//! optimistic-concurrency check, and no versioning.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{Mouse, MouseId, Step, TrainingDocument};

/// A point-in-time export of the persisted bytes.
#[derive(Debug, Clone)]
pub struct Backup {
    /// Download filename with an embedded timestamp
    pub filename: String,
    /// Persisted file contents, verbatim
    pub bytes: Vec<u8>,
}

/// Load/save/backup abstraction over the persisted JSON file.
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DocumentStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Materialize the built-in default document if no file exists yet.
    fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Store(e.to_string()))?;
        }
        self.save(&default_document())?;
        info!("Initialized default data file: {}", self.path.display());
        Ok(())
    }

    /// Current training document. On first use persists the built-in
    /// default document before returning it.
    pub fn load(&self) -> Result<TrainingDocument> {
        self.ensure_initialized()?;
        let text = fs::read_to_string(&self.path).map_err(|e| Error::Store(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| Error::Store(e.to_string()))
    }

    /// Whole-document replacement; last writer wins.
    pub fn save(&self, doc: &TrainingDocument) -> Result<()> {
        let json =
            serde_json::to_string_pretty(doc).map_err(|e| Error::Store(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| Error::Store(e.to_string()))
    }

    /// Current document as raw JSON, without schema interpretation.
    pub fn load_raw(&self) -> Result<Value> {
        self.ensure_initialized()?;
        let text = fs::read_to_string(&self.path).map_err(|e| Error::Store(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| Error::Store(e.to_string()))
    }

    /// Persist arbitrary JSON verbatim. The store is schema-agnostic at
    /// this layer; any stricter validation is the client's responsibility.
    pub fn save_raw(&self, value: &Value) -> Result<()> {
        let json =
            serde_json::to_string_pretty(value).map_err(|e| Error::Store(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| Error::Store(e.to_string()))
    }

    /// Current persisted bytes verbatim, labeled with a timestamped export
    /// filename. Never mutates the stored document (beyond first-use
    /// default initialization when no file exists yet).
    pub fn backup(&self) -> Result<Backup> {
        self.ensure_initialized()?;
        let bytes = fs::read(&self.path).map_err(|e| Error::Store(e.to_string()))?;
        Ok(Backup {
            filename: backup_filename(Utc::now()),
            bytes,
        })
    }
}

/// `mouseTrainingData-backup-{ISO-8601 with ':' and '.' replaced by '-'}.json`
fn backup_filename(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("mouseTrainingData-backup-{}.json", stamp)
}

/// The built-in default document: the known-good 13-mouse lab roster, all
/// assigned to step 0.
pub fn default_document() -> TrainingDocument {
    const ROSTER: [(&str, &str); 13] = [
        ("C003", "#d7aefb"),
        ("C004", "#d7aefb"),
        ("X013", "#d7aefb"),
        ("C006", "#d7aefb"),
        ("Y006", "#aecbfa"),
        ("X009", "#aecbfa"),
        ("X010", "#aecbfa"),
        ("X011", "#aecbfa"),
        ("X012", "#aecbfa"),
        ("T022", "#ccff90"),
        ("T023", "#ccff90"),
        ("T024", "#ccff90"),
        ("T025", "#ccff90"),
    ];

    const DISPLAY_ORDER: [&str; 13] = [
        "C003", "C004", "C006", "X013", "Y006", "X009", "X010", "X011", "X012", "T022",
        "T023", "T024", "T025",
    ];

    let mice: Vec<Mouse> = ROSTER
        .iter()
        .map(|(id, color)| Mouse::new(MouseId::unchecked(*id), *color))
        .collect();

    let mut steps: Vec<Step> = DEFAULT_STEP_TITLES.iter().map(|t| Step::empty(*t)).collect();
    steps[0].mice = mice.iter().map(|m| m.id.clone()).collect();

    TrainingDocument {
        mice,
        steps,
        daily_records: Vec::new(),
        mouse_order: DISPLAY_ORDER
            .iter()
            .map(|id| MouseId::unchecked(*id))
            .collect(),
    }
}

/// Step titles of the deployed training protocol.
pub const DEFAULT_STEP_TITLES: [&str; 8] = [
    "0. Habituation",
    "1. Touch / Push \u{2013} Reward (M). (1 lever, LED constantly on)",
    "2. [Start] \u{2013} LED on \u{2013} Push \u{2013} Reward (M) \u{2013} [End]. (1 lever)",
    "3. [Start] \u{2013} LED on \u{2013} Push \u{2013} Reward (A) \u{2013} [End]. (1 lever, position changing)",
    "4. [Start] \u{2013} 1 of 3 LED on \u{2013} Push \u{2013} Reward (A) \u{2013} [End]. (3 lever)",
    "5. [Start] \u{2013} LED 1 on \u{2013} Push \u{2013} Reward (A) \u{2013} [End], ITI, \\n    [Start] \u{2013} LED 2 on \u{2013} Push \u{2013} Reward (A) \u{2013} [End], ITI, \\n    [Start] \u{2013} LED 3 on \u{2013} Push \u{2013} Reward (A+M) \u{2013} [End]. \\n(\u{2191} Repeat these 3 trials in the same order)",
    "6. [Start] \u{2013} LED 1 on \u{2013} Push \u{2013} Reward (M) in Interval 1 \u{2013} \\n                   LED 2 on \u{2013} Push \u{2013} Reward (M) in Interval 2 \u{2013} \\n                   LED 3 on \u{2013} Push \u{2013} Reward (A) \u{2013} [End].",
    "7. [Start] \u{2013} LED 1 on \u{2013} Push \u{2013} Interval 1 \u{2013} \\n                  LED 2 on \u{2013} Push \u{2013} Interval 2 \u{2013} \\n                  LED 3 on \u{2013} Push \u{2013} Reward (A) \u{2013} [End].\\n (AUTO group Final version)",
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn backup_filename_replaces_separators() {
        let at = Utc.with_ymd_and_hms(2025, 8, 30, 12, 34, 56).unwrap();
        let name = backup_filename(at);
        assert_eq!(name, "mouseTrainingData-backup-2025-08-30T12-34-56-000Z.json");
        assert!(!name.contains(':'));
    }

    #[test]
    fn default_document_shape() {
        let doc = default_document();
        assert_eq!(doc.mice.len(), 13);
        assert_eq!(doc.steps.len(), 8);
        assert_eq!(doc.mouse_order.len(), 13);
        // Everyone starts in step 0
        assert_eq!(doc.steps[0].mice.len(), 13);
        assert!(doc.steps[1..].iter().all(|s| s.mice.is_empty()));
        assert!(doc.daily_records.is_empty());
    }
}
