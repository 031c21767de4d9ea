use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    quest_import::logging::init().context("init logging")?;

    let cli = quest_import::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        quest_import::cli::Command::Import(args) => {
            quest_import::import::run(args).await.context("import")?;
        }
        quest_import::cli::Command::Check(args) => {
            quest_import::import::check(args).await.context("check")?;
        }
    }

    Ok(())
}
