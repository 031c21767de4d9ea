use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::formats::QuestImportRecord;

/// Persistence collaborator for imported quests.
///
/// The store assigns the quest id; callers never read the created entity back
/// as part of an import.
#[async_trait]
pub trait QuestStore: Send + Sync {
    async fn create(&self, quest: &QuestImportRecord) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredQuest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub quest: QuestImportRecord,
}

#[derive(Debug, Clone)]
pub struct LocalFsQuestStore {
    base_dir: PathBuf,
}

impl LocalFsQuestStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn quests_dir(&self) -> PathBuf {
        self.base_dir.join("quests")
    }

    fn quest_json_path(&self, quest_id: &str) -> PathBuf {
        self.quests_dir().join(format!("{quest_id}.json"))
    }

    pub async fn get(&self, quest_id: &str) -> anyhow::Result<Option<StoredQuest>> {
        let path = self.quest_json_path(quest_id);
        read_json(&path)
            .await
            .with_context(|| format!("read: {}", path.display()))
    }

    /// All stored quests, oldest first.
    pub async fn list(&self) -> anyhow::Result<Vec<StoredQuest>> {
        let dir = self.quests_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("read quests dir: {}", dir.display()));
            }
        };

        let mut quests = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("read quests dir entry")? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(quest) = read_json::<StoredQuest>(&path)
                .await
                .with_context(|| format!("read: {}", path.display()))?
            {
                quests.push(quest);
            }
        }
        quests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(quests)
    }
}

#[async_trait]
impl QuestStore for LocalFsQuestStore {
    async fn create(&self, quest: &QuestImportRecord) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let stored = StoredQuest {
            id: id.clone(),
            created_at: Utc::now(),
            quest: quest.clone(),
        };
        write_json_atomic(&self.quest_json_path(&id), &stored)
            .await
            .context("write quest json")?;
        tracing::debug!(quest_id = %id, name = %quest.name, "stored quest");
        Ok(id)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let value = serde_json::from_slice(&bytes).context("parse json")?;
    Ok(Some(value))
}

async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
