use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FILTER: &str = "QUEST_IMPORT_LOG";
const DEFAULT_FILTER: &str = "info";

/// Logs go to stderr so `check` output on stdout stays machine-readable.
///
/// `QUEST_IMPORT_LOG` takes precedence over `RUST_LOG`.
pub fn init() -> anyhow::Result<()> {
    let directives = filter_directives(
        std::env::var(ENV_LOG_FILTER).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("build log filter from {directives:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

fn filter_directives(own: Option<String>, rust_log: Option<String>) -> String {
    [own, rust_log]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim().to_owned())
        .find(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}
