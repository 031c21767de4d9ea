//! Coerces untrusted quest candidates into [`QuestImportRecord`]s.
//!
//! Each field is checked on its own. A missing or `null` field takes its
//! default silently, and a present but unusable one takes its default and
//! leaves a [`Coercion`] behind. Only a candidate that is not a JSON object
//! is rejected.

mod entities;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Number, Value};

use crate::formats::{QuestImportRecord, QuestStatus, SplashPosition};
use crate::ids::IdGenerator;

pub use entities::{sanitize_date, sanitize_giver_data, sanitize_rewards, sanitize_tasks};

pub const DEFAULT_PLACEHOLDER_NAME: &str = "New Quest";
pub const DEFAULT_IMAGE: &str = "actor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionKind {
    /// Present with a type the field cannot hold; the default was used.
    WrongType,
    /// A string that was empty after trimming.
    Blank,
    /// Right type, but not one of the allowed values.
    OutOfRange,
    /// A list entry that was not an object and was removed.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coercion {
    pub field: String,
    pub kind: CoercionKind,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            CoercionKind::WrongType => "wrong type, defaulted",
            CoercionKind::Blank => "blank, defaulted",
            CoercionKind::OutOfRange => "unknown value, defaulted",
            CoercionKind::Dropped => "invalid entry, dropped",
        };
        write!(f, "{}: {what}", self.field)
    }
}

#[derive(Debug, Clone)]
pub struct Sanitized {
    pub record: QuestImportRecord,
    pub coercions: Vec<Coercion>,
}

#[derive(Clone)]
pub struct Sanitizer {
    ids: Arc<dyn IdGenerator>,
    placeholder_name: String,
}

impl Sanitizer {
    pub fn new(ids: Arc<dyn IdGenerator>, placeholder_name: impl Into<String>) -> Self {
        Self {
            ids,
            placeholder_name: placeholder_name.into(),
        }
    }

    /// Returns `None` only when `candidate` is not a JSON object.
    pub fn sanitize(&self, candidate: &Value) -> Option<Sanitized> {
        let map = candidate.as_object()?;
        let mut fields = Fields::new(map);

        let name = fields
            .trimmed("name")
            .unwrap_or_else(|| self.placeholder_name.clone());
        let status = fields
            .choice("status", QuestStatus::parse)
            .unwrap_or_default();
        let giver = fields.trimmed("giver");
        let giver_data = sanitize_giver_data(map.get("giverData"), &mut fields.coercions);
        let description = fields.string("description").unwrap_or_default();
        let gmnotes = fields.string("gmnotes").unwrap_or_default();
        let playernotes = fields.string("playernotes").unwrap_or_default();
        let image = fields
            .string("image")
            .unwrap_or_else(|| DEFAULT_IMAGE.to_owned());
        let giver_name = fields
            .trimmed("giverName")
            .unwrap_or_else(|| DEFAULT_IMAGE.to_owned());
        let splash = fields.string("splash").unwrap_or_default();
        let splash_pos = fields
            .choice("splashPos", SplashPosition::parse)
            .unwrap_or_default();
        let splash_as_icon = fields.boolean("splashAsIcon").unwrap_or(false);
        let location = fields.trimmed("location");
        let priority = fields.integer("priority").unwrap_or(0);
        let quest_type = fields.trimmed("type");
        let ids = self.ids.as_ref();
        let tasks = sanitize_tasks(map.get("tasks"), ids, &mut fields.coercions);
        let rewards = sanitize_rewards(map.get("rewards"), ids, &mut fields.coercions);
        let date = sanitize_date(map.get("date"), &mut fields.coercions);

        let record = QuestImportRecord {
            name,
            status,
            giver,
            giver_data,
            description,
            gmnotes,
            playernotes,
            image,
            giver_name,
            splash,
            splash_pos,
            splash_as_icon,
            location,
            priority,
            quest_type,
            parent: None,
            subquests: Vec::new(),
            tasks,
            rewards,
            date,
        };

        Some(Sanitized {
            record,
            coercions: fields.coercions,
        })
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer")
            .field("placeholder_name", &self.placeholder_name)
            .finish_non_exhaustive()
    }
}

/// Typed reads over one JSON object, collecting coercions as it goes.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    coercions: Vec<Coercion>,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            coercions: Vec::new(),
        }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    fn note(&mut self, key: &str, kind: CoercionKind) {
        note(&mut self.coercions, key, kind);
    }

    fn string(&mut self, key: &str) -> Option<String> {
        match self.present(key)? {
            Value::String(text) => Some(text.clone()),
            _ => {
                self.note(key, CoercionKind::WrongType);
                None
            }
        }
    }

    fn trimmed(&mut self, key: &str) -> Option<String> {
        let text = self.string(key)?;
        let text = trim_text(&text);
        if text.is_empty() {
            self.note(key, CoercionKind::Blank);
            return None;
        }
        Some(text.to_owned())
    }

    fn choice<T>(&mut self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let text = self.string(key)?;
        let parsed = parse(&text);
        if parsed.is_none() {
            self.note(key, CoercionKind::OutOfRange);
        }
        parsed
    }

    fn boolean(&mut self, key: &str) -> Option<bool> {
        match self.present(key)? {
            Value::Bool(flag) => Some(*flag),
            _ => {
                self.note(key, CoercionKind::WrongType);
                None
            }
        }
    }

    fn integer(&mut self, key: &str) -> Option<i64> {
        match self.present(key)? {
            Value::Number(number) => {
                let integer = as_integer(number);
                if integer.is_none() {
                    self.note(key, CoercionKind::OutOfRange);
                }
                integer
            }
            _ => {
                self.note(key, CoercionKind::WrongType);
                None
            }
        }
    }
}

fn note(coercions: &mut Vec<Coercion>, field: &str, kind: CoercionKind) {
    coercions.push(Coercion {
        field: field.to_owned(),
        kind,
    });
}

/// Trims whitespace and stray byte-order marks.
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Integral numbers only; `3.0` counts, `2.5` does not.
fn as_integer(number: &Number) -> Option<i64> {
    if let Some(integer) = number.as_i64() {
        return Some(integer);
    }
    if number.is_u64() {
        return None;
    }
    let float = number.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

/// JavaScript-style truthiness, used for loosely typed task flags.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
