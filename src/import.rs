use std::fmt;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use serde_json::Value;

use crate::cli::{CheckArgs, ImportArgs};
use crate::config::ImportConfig;
use crate::envelope::{EnvelopeKind, normalize};
use crate::ids::RandomIds;
use crate::report::{render, report};
use crate::sanitize::Sanitizer;
use crate::store::{LocalFsQuestStore, QuestStore};

/// A user-selected file whose text is read once per import.
#[async_trait]
pub trait ImportFile: Send + Sync {
    fn name(&self) -> String;
    async fn read_text(&self) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImportFile for LocalFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_text(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read import file: {}", self.path.display()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportTally {
    pub success: usize,
    pub fail: usize,
}

impl ImportTally {
    #[must_use]
    pub fn with_success(self) -> Self {
        Self {
            success: self.success + 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_failure(self) -> Self {
        Self {
            fail: self.fail + 1,
            ..self
        }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            success: self.success + other.success,
            fail: self.fail + other.fail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportFailure {
    /// The file could not be read; counts once for the whole file.
    Read(String),
    /// The file is not valid JSON; counts once for the whole file.
    Parse(String),
    /// No candidates found in the payload; counts once for the whole file.
    EmptyPayload,
    InvalidRecordShape { index: usize },
    StoreRejection { index: usize, message: String },
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(message) => write!(f, "unreadable file: {message}"),
            Self::Parse(message) => write!(f, "invalid json: {message}"),
            Self::EmptyPayload => f.write_str("no quest records found"),
            Self::InvalidRecordShape { index } => {
                write!(f, "record {index} is not an object")
            }
            Self::StoreRejection { index, message } => {
                write!(f, "record {index} rejected by store: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub name: String,
    pub tally: ImportTally,
    pub failures: Vec<ImportFailure>,
}

impl FileOutcome {
    fn new(name: String) -> Self {
        Self {
            name,
            tally: ImportTally::default(),
            failures: Vec::new(),
        }
    }

    fn succeeded(self) -> Self {
        Self {
            tally: self.tally.with_success(),
            ..self
        }
    }

    fn failed(mut self, failure: ImportFailure) -> Self {
        self.failures.push(failure);
        Self {
            tally: self.tally.with_failure(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub tally: ImportTally,
    pub files: Vec<FileOutcome>,
}

impl BatchOutcome {
    fn with_file(mut self, file: FileOutcome) -> Self {
        self.tally = self.tally.merge(file.tally);
        self.files.push(file);
        self
    }
}

/// Drives read, parse, normalize, sanitize and store for a batch of files.
///
/// Files and their candidates are handled strictly in order, one store call
/// at a time. Failures are absorbed into the tally and never abort the batch.
pub struct ImportCoordinator {
    store: Arc<dyn QuestStore>,
    sanitizer: Sanitizer,
}

impl ImportCoordinator {
    pub fn new(store: Arc<dyn QuestStore>, sanitizer: Sanitizer) -> Self {
        Self { store, sanitizer }
    }

    pub async fn import_files<F: ImportFile>(&self, files: &[F]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for file in files {
            let file_outcome = self.import_file(file).await;
            outcome = outcome.with_file(file_outcome);
        }
        outcome
    }

    pub async fn import_file(&self, file: &dyn ImportFile) -> FileOutcome {
        let name = file.name();
        let outcome = FileOutcome::new(name.clone());

        let text = match file.read_text().await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %name, ?err, "failed to read import file");
                return outcome.failed(ImportFailure::Read(format!("{err:#}")));
            }
        };
        let payload = match parse_payload(&text) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(file = %name, %err, "import file is not valid json");
                return outcome.failed(ImportFailure::Parse(err.to_string()));
            }
        };

        let envelope = EnvelopeKind::classify(&payload);
        let candidates = normalize(&payload);
        tracing::debug!(file = %name, ?envelope, candidates = candidates.len(), "normalized payload");
        if candidates.is_empty() {
            tracing::warn!(file = %name, ?envelope, "no quest records found");
            return outcome.failed(ImportFailure::EmptyPayload);
        }

        let mut outcome = outcome;
        for (index, candidate) in candidates.iter().enumerate() {
            outcome = self.import_candidate(outcome, index, candidate).await;
        }
        outcome
    }

    async fn import_candidate(
        &self,
        outcome: FileOutcome,
        index: usize,
        candidate: &Value,
    ) -> FileOutcome {
        let Some(sanitized) = self.sanitizer.sanitize(candidate) else {
            tracing::warn!(file = %outcome.name, index, "quest record is not an object");
            return outcome.failed(ImportFailure::InvalidRecordShape { index });
        };
        for coercion in &sanitized.coercions {
            tracing::debug!(file = %outcome.name, index, %coercion, "coerced field");
        }

        match self.store.create(&sanitized.record).await {
            Ok(quest_id) => {
                tracing::debug!(file = %outcome.name, index, %quest_id, "imported quest");
                outcome.succeeded()
            }
            Err(err) => {
                tracing::error!(file = %outcome.name, index, ?err, "store rejected quest");
                outcome.failed(ImportFailure::StoreRejection {
                    index,
                    message: format!("{err:#}"),
                })
            }
        }
    }
}

/// Parses file text as JSON, ignoring a leading UTF-8 byte-order mark.
fn parse_payload(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text.strip_prefix('\u{FEFF}').unwrap_or(text))
}

pub async fn run(args: ImportArgs) -> anyhow::Result<()> {
    if args.files.is_empty() {
        tracing::info!("no files selected; nothing to import");
        return Ok(());
    }

    let config = ImportConfig::from_env(args.store.as_deref()).context("resolve config")?;
    tracing::info!(
        store = %config.store_dir.display(),
        files = args.files.len(),
        "importing quests"
    );

    let store = Arc::new(LocalFsQuestStore::new(&config.store_dir));
    let sanitizer = Sanitizer::new(Arc::new(RandomIds), config.placeholder_name);
    let coordinator = ImportCoordinator::new(store, sanitizer);

    let files: Vec<LocalFile> = args.files.iter().map(LocalFile::new).collect();
    let outcome = coordinator.import_files(&files).await;
    tracing::info!(
        success = outcome.tally.success,
        fail = outcome.tally.fail,
        "import finished"
    );

    if let Some(notification) = report(outcome.tally) {
        println!("{}: {}", notification.severity.as_str(), render(&notification));
    }

    Ok(())
}

/// Dry run: prints each sanitized record of one file as a JSON line.
pub async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let config = ImportConfig::from_env(None).context("resolve config")?;
    let sanitizer = Sanitizer::new(Arc::new(RandomIds), config.placeholder_name);

    let file = LocalFile::new(&args.file);
    let text = file.read_text().await?;
    let payload = parse_payload(&text)
        .with_context(|| format!("parse import file: {}", file.name()))?;

    let envelope = EnvelopeKind::classify(&payload);
    let candidates = normalize(&payload);
    if candidates.is_empty() {
        anyhow::bail!("no quest records found in {} ({envelope:?})", file.name());
    }

    let mut out = std::io::stdout().lock();
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(sanitized) = sanitizer.sanitize(candidate) else {
            tracing::warn!(index, "quest record is not an object; skipped");
            continue;
        };
        for coercion in &sanitized.coercions {
            tracing::info!(index, %coercion, "coerced field");
        }
        serde_json::to_writer(&mut out, &sanitized.record).context("serialize quest record")?;
        out.write_all(b"\n").context("write newline")?;
    }
    out.flush().context("flush stdout")?;

    Ok(())
}
