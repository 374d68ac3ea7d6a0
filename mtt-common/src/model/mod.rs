//! Training document model
//!
//! Canonical in-memory shape of the shared dataset. Mice live in a single
//! canonical list; steps hold ID references only. The denormalized on-disk
//! shape (steps embedding mouse copies) is handled by [`wire`], which joins
//! on serialize and collapses on deserialize so the two copies cannot drift.

mod wire;

pub use wire::DocumentWire;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Number of training steps in every document. Steps are fixed-cardinality
/// and fixed-order; none are added or removed at runtime.
pub const STEP_COUNT: usize = 8;

/// Mouse identifier: exactly one uppercase ASCII letter followed by
/// 3 or 4 ASCII digits (e.g. `C003`, `Y006`, `X0101` is invalid).
///
/// Persisted documents are accepted permissively (any string), so the
/// newtype is `#[serde(transparent)]`; the strict convention is enforced
/// at the boundaries that mint new IDs via [`MouseId::matches`] and
/// [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MouseId(String);

impl MouseId {
    /// Whether `text` (after trimming) satisfies the ID convention.
    pub fn matches(text: &str) -> bool {
        let t = text.trim();
        let mut chars = t.chars();
        match chars.next() {
            Some(c) if c.is_ascii_uppercase() => {}
            _ => return false,
        }
        let digits = chars.as_str();
        (3..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
    }

    /// Leading letter of the ID, used for step assignment on import.
    pub fn prefix(&self) -> Option<char> {
        self.0.chars().next()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Construct without validation (for IDs read back from a persisted
    /// document, which may predate the convention).
    pub fn unchecked(id: impl Into<String>) -> Self {
        MouseId(id.into())
    }
}

impl FromStr for MouseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if MouseId::matches(s) {
            Ok(MouseId(s.trim().to_string()))
        } else {
            Err(Error::InvalidInput(format!(
                "not a valid mouse ID (letter + 3-4 digits): {:?}",
                s
            )))
        }
    }
}

impl fmt::Display for MouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-mouse session counter.
///
/// The wire form is historically `str|number`: zero renders as the empty
/// string (the UI shows a blank cell), anything else as a JSON number.
/// Deserialization is permissive: numbers, numeric strings and the empty
/// string are all accepted; unparseable text collapses to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCount(pub u32);

impl Serialize for SessionCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 == 0 {
            serializer.serialize_str("")
        } else {
            serializer.serialize_u32(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for SessionCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountVisitor;

        impl serde::de::Visitor<'_> for CountVisitor {
            type Value = SessionCount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a session count as a number or string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<SessionCount, E> {
                Ok(SessionCount(u32::try_from(v).unwrap_or(u32::MAX)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<SessionCount, E> {
                Ok(SessionCount(u32::try_from(v).unwrap_or(0)))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<SessionCount, E> {
                Ok(SessionCount(if v.is_sign_negative() { 0 } else { v as u32 }))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<SessionCount, E> {
                Ok(SessionCount(v.trim().parse().unwrap_or(0)))
            }
        }

        deserializer.deserialize_any(CountVisitor)
    }
}

/// A tracked subject: identity, display color, session count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mouse {
    pub id: MouseId,
    pub sessions: SessionCount,
    /// Display color, `#RRGGBB`
    pub color: String,
}

impl Mouse {
    pub fn new(id: MouseId, color: impl Into<String>) -> Self {
        Mouse {
            id,
            sessions: SessionCount::default(),
            color: color.into(),
        }
    }
}

/// One fixed stage in the training pipeline.
///
/// Holds ID references into the canonical mouse list, never embedded
/// copies. The title is free text and may carry a long protocol
/// description.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    pub mice: Vec<MouseId>,
}

impl Step {
    pub fn empty(title: impl Into<String>) -> Self {
        Step {
            title: title.into(),
            mice: Vec::new(),
        }
    }
}

/// One logged training-session observation for a mouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Unique, derived from mouse ID + timestamp + ordinal
    pub id: String,
    #[serde(rename = "mouseId")]
    pub mouse_id: MouseId,
    pub date: chrono::NaiveDate,
    /// Session number, positive
    pub session: u32,
    /// Denormalized copy of a step title at time of recording
    pub step: String,
    pub performance: String,
    pub notes: String,
}

impl DailyRecord {
    /// Record ID format: `record-{mouseId}-{epochMillis}-{ordinal}`.
    pub fn make_id(mouse_id: &MouseId, epoch_millis: i64, ordinal: usize) -> String {
        format!("record-{}-{}-{}", mouse_id, epoch_millis, ordinal)
    }
}

/// The root aggregate, persisted as one unit.
///
/// `mouse_order` defines display order independently of step membership.
/// Neither it nor step rosters are referentially enforced against the
/// canonical list; consumers treat an unknown ID as "skip".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DocumentWire", from = "DocumentWire")]
pub struct TrainingDocument {
    pub mice: Vec<Mouse>,
    pub steps: Vec<Step>,
    pub daily_records: Vec<DailyRecord>,
    pub mouse_order: Vec<MouseId>,
}

impl TrainingDocument {
    /// A document with the given step titles and no mice.
    pub fn with_steps<T: Into<String>>(titles: impl IntoIterator<Item = T>) -> Self {
        TrainingDocument {
            mice: Vec::new(),
            steps: titles.into_iter().map(Step::empty).collect(),
            daily_records: Vec::new(),
            mouse_order: Vec::new(),
        }
    }

    /// Look up a mouse in the canonical list.
    pub fn mouse(&self, id: &MouseId) -> Option<&Mouse> {
        self.mice.iter().find(|m| &m.id == id)
    }
}
