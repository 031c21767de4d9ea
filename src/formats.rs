use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    #[default]
    Inactive,
    Available,
    Active,
    Completed,
    Failed,
}

impl QuestStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "inactive" => Some(Self::Inactive),
            "available" => Some(Self::Available),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplashPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

impl SplashPosition {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// A quest as handed to the store after sanitization.
///
/// `parent` is always `None` and `subquests` always empty: imported quests are
/// never linked into an existing hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestImportRecord {
    pub name: String,
    pub status: QuestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giver_data: Option<GiverData>,
    pub description: String,
    pub gmnotes: String,
    pub playernotes: String,
    pub image: String,
    pub giver_name: String,
    pub splash: String,
    pub splash_pos: SplashPosition,
    pub splash_as_icon: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub priority: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub quest_type: Option<String>,
    pub parent: Option<String>,
    pub subquests: Vec<String>,
    pub tasks: Vec<TaskRecord>,
    pub rewards: Vec<RewardRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GiverData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    pub has_token_img: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: String,
    pub completed: bool,
    pub failed: bool,
    pub hidden: bool,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardRecord {
    #[serde(rename = "type")]
    pub reward_type: Option<String>,
    pub data: Map<String, Value>,
    pub hidden: bool,
    pub locked: bool,
    pub id: String,
}

/// Timestamps are kept as JSON numbers so integer epochs survive unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub create: Option<Number>,
    pub start: Option<Number>,
    pub end: Option<Number>,
}
