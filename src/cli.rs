use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import quests from one or more JSON files into the quest store.
    Import(ImportArgs),
    /// Print the sanitized records of one file without storing them.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Quest store directory (default: $QUEST_IMPORT_STORE_DIR or `quest-store`).
    #[arg(long)]
    pub store: Option<String>,

    /// JSON files to import, processed in the given order.
    pub files: Vec<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// JSON file to inspect.
    pub file: String,
}
