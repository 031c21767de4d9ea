use serde_json::{Map, Value};

use super::{Coercion, CoercionKind, is_truthy, note, trim_text};
use crate::formats::{DateRange, GiverData, RewardRecord, TaskRecord};
use crate::ids::IdGenerator;

/// Keeps object entries only; ids are always regenerated.
pub fn sanitize_tasks(
    value: Option<&Value>,
    ids: &dyn IdGenerator,
    coercions: &mut Vec<Coercion>,
) -> Vec<TaskRecord> {
    object_entries("tasks", value, coercions)
        .into_iter()
        .map(|(path, task)| {
            let mut entry = Entry::new(path, task, coercions);
            TaskRecord {
                name: entry.string("name").unwrap_or_default(),
                completed: flag(task, "completed"),
                failed: flag(task, "failed"),
                hidden: flag(task, "hidden"),
                id: ids.next_id(),
            }
        })
        .collect()
}

/// Rewards are locked unless the input explicitly says otherwise.
pub fn sanitize_rewards(
    value: Option<&Value>,
    ids: &dyn IdGenerator,
    coercions: &mut Vec<Coercion>,
) -> Vec<RewardRecord> {
    object_entries("rewards", value, coercions)
        .into_iter()
        .map(|(path, reward)| {
            let mut entry = Entry::new(path, reward, coercions);
            RewardRecord {
                reward_type: entry.string("type"),
                data: entry.object("data").unwrap_or_default(),
                hidden: entry.boolean("hidden").unwrap_or(false),
                locked: entry.boolean("locked").unwrap_or(true),
                id: ids.next_id(),
            }
        })
        .collect()
}

/// `None` unless at least one of uuid, name or img is a non-blank string.
pub fn sanitize_giver_data(
    value: Option<&Value>,
    coercions: &mut Vec<Coercion>,
) -> Option<GiverData> {
    let value = value.filter(|value| !value.is_null())?;
    let Some(map) = value.as_object() else {
        note(coercions, "giverData", CoercionKind::WrongType);
        return None;
    };

    let text = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .map(trim_text)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    };
    let giver_data = GiverData {
        uuid: text("uuid"),
        name: text("name"),
        img: text("img"),
        has_token_img: map.get("hasTokenImg").is_some_and(is_truthy),
    };

    if giver_data.uuid.is_none() && giver_data.name.is_none() && giver_data.img.is_none() {
        note(coercions, "giverData", CoercionKind::Blank);
        return None;
    }
    Some(giver_data)
}

/// `None` unless at least one of create, start or end is a number.
pub fn sanitize_date(value: Option<&Value>, coercions: &mut Vec<Coercion>) -> Option<DateRange> {
    let value = value.filter(|value| !value.is_null())?;
    let Some(map) = value.as_object() else {
        note(coercions, "date", CoercionKind::WrongType);
        return None;
    };

    let mut timestamp = |key: &str| match map.get(key) {
        Some(Value::Number(number)) => Some(number.clone()),
        None | Some(Value::Null) => None,
        Some(_) => {
            note(coercions, &format!("date.{key}"), CoercionKind::WrongType);
            None
        }
    };
    let date = DateRange {
        create: timestamp("create"),
        start: timestamp("start"),
        end: timestamp("end"),
    };

    if date.create.is_none() && date.start.is_none() && date.end.is_none() {
        return None;
    }
    Some(date)
}

/// Object entries of a list, each paired with its `field[index]` path.
fn object_entries<'v>(
    field: &'static str,
    value: Option<&'v Value>,
    coercions: &mut Vec<Coercion>,
) -> Vec<(String, &'v Map<String, Value>)> {
    let entries: &'v [Value] = match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => {
            note(coercions, field, CoercionKind::WrongType);
            &[]
        }
    };

    let mut kept = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let path = format!("{field}[{index}]");
        match entry.as_object() {
            Some(map) => kept.push((path, map)),
            None => note(coercions, &path, CoercionKind::Dropped),
        }
    }
    kept
}

/// Typed reads over one list entry; wrong-typed values are noted as
/// `field[index].key`.
struct Entry<'v, 'c> {
    path: String,
    map: &'v Map<String, Value>,
    coercions: &'c mut Vec<Coercion>,
}

impl<'v, 'c> Entry<'v, 'c> {
    fn new(path: String, map: &'v Map<String, Value>, coercions: &'c mut Vec<Coercion>) -> Self {
        Self {
            path,
            map,
            coercions,
        }
    }

    fn read<T>(&mut self, key: &str, accept: impl FnOnce(&'v Value) -> Option<T>) -> Option<T> {
        let value = self.map.get(key).filter(|value| !value.is_null())?;
        let accepted = accept(value);
        if accepted.is_none() {
            let field = format!("{}.{key}", self.path);
            note(self.coercions, &field, CoercionKind::WrongType);
        }
        accepted
    }

    fn string(&mut self, key: &str) -> Option<String> {
        self.read(key, |value| value.as_str().map(str::to_owned))
    }

    fn boolean(&mut self, key: &str) -> Option<bool> {
        self.read(key, Value::as_bool)
    }

    fn object(&mut self, key: &str) -> Option<Map<String, Value>> {
        self.read(key, |value| value.as_object().cloned())
    }
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(is_truthy)
}
