//! Denormalized wire shape of the training document.
//!
//! The persisted JSON embeds full mouse copies inside each step roster.
//! Keeping that shape in memory lets the two copies drift, so the canonical
//! model stores ID references and this module does the translation:
//!
//! - serialize: join each step's IDs against the canonical mouse list,
//!   skipping IDs with no canonical record;
//! - deserialize: collapse embedded copies back to IDs. The canonical list
//!   wins when an embedded copy disagrees with it; embedded mice absent
//!   from the canonical list are appended to it so no roster entry is lost.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DailyRecord, Mouse, MouseId, Step, TrainingDocument};

/// Step as persisted: roster of embedded mouse copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepWire {
    pub title: String,
    pub mice: Vec<Mouse>,
}

/// On-disk / over-the-wire document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWire {
    pub mice: Vec<Mouse>,
    pub steps: Vec<StepWire>,
    #[serde(rename = "mouseOrder")]
    pub mouse_order: Vec<MouseId>,
    #[serde(rename = "dailyRecords", default)]
    pub daily_records: Vec<DailyRecord>,
}

impl From<TrainingDocument> for DocumentWire {
    fn from(doc: TrainingDocument) -> Self {
        let by_id: HashMap<&MouseId, &Mouse> = doc.mice.iter().map(|m| (&m.id, m)).collect();

        let steps = doc
            .steps
            .iter()
            .map(|step| StepWire {
                title: step.title.clone(),
                mice: step
                    .mice
                    .iter()
                    .filter_map(|id| by_id.get(id).map(|m| (*m).clone()))
                    .collect(),
            })
            .collect();

        DocumentWire {
            mice: doc.mice,
            steps,
            mouse_order: doc.mouse_order,
            daily_records: doc.daily_records,
        }
    }
}

impl From<DocumentWire> for TrainingDocument {
    fn from(wire: DocumentWire) -> Self {
        let mut mice = wire.mice;
        let mut known: Vec<MouseId> = mice.iter().map(|m| m.id.clone()).collect();

        let steps = wire
            .steps
            .into_iter()
            .map(|step| Step {
                title: step.title,
                mice: step
                    .mice
                    .into_iter()
                    .map(|embedded| {
                        if !known.contains(&embedded.id) {
                            known.push(embedded.id.clone());
                            mice.push(embedded.clone());
                        }
                        embedded.id
                    })
                    .collect(),
            })
            .collect();

        TrainingDocument {
            mice,
            steps,
            daily_records: wire.daily_records,
            mouse_order: wire.mouse_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionCount;

    fn doc_with_one_step() -> TrainingDocument {
        let c003 = MouseId::unchecked("C003");
        let x010 = MouseId::unchecked("X010");
        TrainingDocument {
            mice: vec![
                Mouse::new(c003.clone(), "#d7aefb"),
                Mouse::new(x010.clone(), "#aecbfa"),
            ],
            steps: vec![Step {
                title: "0. Habituation".into(),
                mice: vec![c003.clone(), x010.clone()],
            }],
            daily_records: Vec::new(),
            mouse_order: vec![c003, x010],
        }
    }

    #[test]
    fn serialize_joins_step_rosters() {
        let json = serde_json::to_value(doc_with_one_step()).unwrap();
        let roster = &json["steps"][0]["mice"];
        assert_eq!(roster.as_array().unwrap().len(), 2);
        // Embedded copies carry id/sessions/color, not bare IDs
        assert_eq!(roster[0]["id"], "C003");
        assert_eq!(roster[0]["color"], "#d7aefb");
        assert_eq!(roster[0]["sessions"], "");
    }

    #[test]
    fn serialize_skips_unknown_step_references() {
        let mut doc = doc_with_one_step();
        doc.steps[0].mice.push(MouseId::unchecked("Z999"));

        let json = serde_json::to_value(doc).unwrap();
        assert_eq!(json["steps"][0]["mice"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn round_trip_is_identity_for_valid_documents() {
        let doc = doc_with_one_step();
        let json = serde_json::to_string(&doc).unwrap();
        let back: TrainingDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn collapse_prefers_canonical_record_on_drift() {
        // Embedded copy disagrees with the canonical list (stale sessions)
        let json = serde_json::json!({
            "mice": [ { "id": "C003", "sessions": 5, "color": "#d7aefb" } ],
            "steps": [ {
                "title": "0. Habituation",
                "mice": [ { "id": "C003", "sessions": 2, "color": "#000000" } ]
            } ],
            "mouseOrder": ["C003"]
        });

        let doc: TrainingDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.mice.len(), 1);
        assert_eq!(doc.mice[0].sessions, SessionCount(5));
        assert_eq!(doc.mice[0].color, "#d7aefb");
        assert_eq!(doc.steps[0].mice, vec![MouseId::unchecked("C003")]);
    }

    #[test]
    fn collapse_recovers_roster_only_mice() {
        // A mouse that exists only inside a step roster is appended to the
        // canonical list instead of being dropped.
        let json = serde_json::json!({
            "mice": [],
            "steps": [ {
                "title": "0. Habituation",
                "mice": [ { "id": "T022", "sessions": "", "color": "#ccff90" } ]
            } ],
            "mouseOrder": []
        });

        let doc: TrainingDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.mice.len(), 1);
        assert_eq!(doc.mice[0].id, MouseId::unchecked("T022"));
    }

    #[test]
    fn missing_daily_records_key_reads_as_empty() {
        let json = serde_json::json!({
            "mice": [],
            "steps": [],
            "mouseOrder": []
        });
        let doc: TrainingDocument = serde_json::from_value(json).unwrap();
        assert!(doc.daily_records.is_empty());
    }
}
