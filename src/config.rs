use std::path::PathBuf;

use crate::sanitize::DEFAULT_PLACEHOLDER_NAME;

pub const ENV_STORE_DIR: &str = "QUEST_IMPORT_STORE_DIR";
pub const ENV_PLACEHOLDER_NAME: &str = "QUEST_IMPORT_PLACEHOLDER_NAME";
pub const DEFAULT_STORE_DIR: &str = "quest-store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub store_dir: PathBuf,
    /// Name given to quests whose own name is missing or blank.
    pub placeholder_name: String,
}

impl ImportConfig {
    /// `store_arg` (from `--store`) wins over the environment.
    pub fn from_env(store_arg: Option<&str>) -> anyhow::Result<Self> {
        Self::from_lookup(store_arg, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        store_arg: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let store_dir = match store_arg {
            Some(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    anyhow::bail!("--store must not be empty");
                }
                raw.to_owned()
            }
            None => non_blank(lookup(ENV_STORE_DIR))
                .unwrap_or_else(|| DEFAULT_STORE_DIR.to_owned()),
        };
        let placeholder_name = non_blank(lookup(ENV_PLACEHOLDER_NAME))
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_NAME.to_owned());

        Ok(Self {
            store_dir: PathBuf::from(store_dir),
            placeholder_name,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
