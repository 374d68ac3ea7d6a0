//! Mouse identity parser: turns loosely structured tabular input into a
//! training-document seed.
//!
//! Runs as an offline batch step outside the request path. Header and ID
//! detection are heuristic (substring scan over a fixed window of leading
//! rows) and sit behind [`RowClassifier`] so a stricter strategy, e.g.
//! explicit column mapping, can replace them without touching the rest of
//! the pipeline.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::model::{DailyRecord, Mouse, MouseId, Step, TrainingDocument, STEP_COUNT};

/// One spreadsheet row, cells as text.
pub type Row = Vec<String>;

/// Classifies the leading rows of tabular input: which row is the header,
/// and which cells carry candidate mouse IDs.
pub trait RowClassifier {
    /// Index of the header row.
    fn header_row(&self, rows: &[Row]) -> usize;

    /// Candidate mouse IDs, deduplicated, first-seen order preserved.
    fn candidate_ids(&self, rows: &[Row]) -> Vec<MouseId>;
}

/// Best-effort detection heuristics.
///
/// Header: first of the leading 10 rows containing a cell whose lowercase
/// text includes one of a few keywords, falling back to row 0. ID scan:
/// cells of the leading 5 rows fully matching the mouse-ID convention.
/// Both windows are independent of each other.
#[derive(Debug, Default)]
pub struct HeuristicClassifier;

const HEADER_SCAN_ROWS: usize = 10;
const ID_SCAN_ROWS: usize = 5;
const HEADER_KEYWORDS: [&str; 4] = ["mouse", "id", "date", "session"];

impl RowClassifier for HeuristicClassifier {
    fn header_row(&self, rows: &[Row]) -> usize {
        rows.iter()
            .take(HEADER_SCAN_ROWS)
            .position(|row| {
                row.iter().any(|cell| {
                    let lower = cell.to_lowercase();
                    HEADER_KEYWORDS.iter().any(|kw| lower.contains(kw))
                })
            })
            .unwrap_or(0)
    }

    fn candidate_ids(&self, rows: &[Row]) -> Vec<MouseId> {
        let mut ids: Vec<MouseId> = Vec::new();
        for row in rows.iter().take(ID_SCAN_ROWS) {
            for cell in row {
                if let Ok(id) = cell.parse::<MouseId>() {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
        }
        ids
    }
}

/// Display palette for imported mice. Selection is pseudo-random and need
/// not be deterministic.
pub const COLOR_PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

/// Step titles seeded by the import path.
pub const IMPORT_STEP_TITLES: [&str; STEP_COUNT] = [
    "0. Habituation",
    "1. Shaping",
    "2. Initial Training",
    "3. Reversal Learning",
    "4. Probe Test",
    "5. Advanced Training",
    "6. Final Assessment",
    "7. Completion",
];

/// Step index by ID-prefix convention: `C` mice start in habituation, `Y`
/// in shaping, `X` in initial training; any other prefix round-robins over
/// all steps by its position in the first-seen ordering.
pub fn step_for_mouse(id: &MouseId, position: usize) -> usize {
    match id.prefix() {
        Some('C') => 0,
        Some('Y') => 1,
        Some('X') => 2,
        _ => position % STEP_COUNT,
    }
}

/// Assemble a training-document seed from tabular input.
///
/// Zero candidate IDs is a valid outcome and yields an empty-rostered
/// document; an unreadable input file is the caller's error to report
/// before rows ever reach this function.
pub fn build_document(rows: &[Row], classifier: &dyn RowClassifier) -> TrainingDocument {
    build_document_at(rows, classifier, Utc::now())
}

fn build_document_at(
    rows: &[Row],
    classifier: &dyn RowClassifier,
    now: DateTime<Utc>,
) -> TrainingDocument {
    let header = classifier.header_row(rows);
    debug!(header_row = header, "classified header row");

    let ids = classifier.candidate_ids(rows);
    info!(mice = ids.len(), "found candidate mouse IDs");

    let today = now.date_naive();
    let epoch_millis = now.timestamp_millis();
    let mut rng = rand::thread_rng();

    let mut doc = TrainingDocument::with_steps(IMPORT_STEP_TITLES);
    for (position, id) in ids.into_iter().enumerate() {
        let color = COLOR_PALETTE[rng.gen_range(0..COLOR_PALETTE.len())];
        let step_index = step_for_mouse(&id, position);

        doc.steps[step_index].mice.push(id.clone());
        doc.daily_records.push(DailyRecord {
            id: DailyRecord::make_id(&id, epoch_millis, position),
            mouse_id: id.clone(),
            date: today,
            session: 1,
            step: doc.steps[step_index].title.clone(),
            performance: "Good".to_string(),
            notes: format!("Imported from spreadsheet for {}", id),
        });
        doc.mouse_order.push(id.clone());
        doc.mice.push(Mouse::new(id, color));
    }

    doc
}

/// Steps with a non-empty roster, for import summaries.
pub fn populated_steps(doc: &TrainingDocument) -> impl Iterator<Item = &Step> {
    doc.steps.iter().filter(|s| !s.mice.is_empty())
}
