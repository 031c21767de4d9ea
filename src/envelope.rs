//! Detection of the envelope shape wrapping quest candidates.
//!
//! Shapes are checked in a fixed order and the first match wins:
//!
//! 1. a bare array,
//! 2. an object with an array `quests`,
//! 3. an object with an array `data`,
//! 4. a document whose `flags["forien-quest-log"].quest` is an object,
//! 5. any other object, taken as a single record,
//! 6. anything else, which yields no candidates.

use serde_json::Value;

pub const MODULE_FLAG_SCOPE: &str = "forien-quest-log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    Array,
    QuestsProperty,
    DataProperty,
    DocumentFlags,
    SingleRecord,
    Unrecognized,
}

impl EnvelopeKind {
    pub fn classify(payload: &Value) -> Self {
        let Value::Object(map) = payload else {
            return match payload {
                Value::Array(_) => Self::Array,
                _ => Self::Unrecognized,
            };
        };

        if matches!(map.get("quests"), Some(Value::Array(_))) {
            Self::QuestsProperty
        } else if matches!(map.get("data"), Some(Value::Array(_))) {
            Self::DataProperty
        } else if flagged_quest(payload).is_some() {
            Self::DocumentFlags
        } else {
            Self::SingleRecord
        }
    }
}

/// Extracts candidate quest records from a parsed payload, in encounter order.
///
/// Never fails: unrecognized shapes produce an empty sequence.
pub fn normalize(payload: &Value) -> Vec<Value> {
    match EnvelopeKind::classify(payload) {
        EnvelopeKind::Array => array_at(Some(payload)),
        EnvelopeKind::QuestsProperty => array_at(payload.get("quests")),
        EnvelopeKind::DataProperty => array_at(payload.get("data")),
        EnvelopeKind::DocumentFlags => flagged_quest(payload).cloned().into_iter().collect(),
        EnvelopeKind::SingleRecord => vec![payload.clone()],
        EnvelopeKind::Unrecognized => Vec::new(),
    }
}

fn array_at(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn flagged_quest(payload: &Value) -> Option<&Value> {
    payload
        .get("flags")?
        .get(MODULE_FLAG_SCOPE)?
        .get("quest")
        .filter(|quest| quest.is_object())
}
