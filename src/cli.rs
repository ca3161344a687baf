use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "repodoc",
    version,
    about = "Repository documentation builder",
    after_help = r#"Examples:
  repodoc analyze --repo . --format mermaid
  repodoc analyze --repo ./checkout --format api
  repodoc tree --repo . --name my-project
  repodoc prompt --repo . --kind docs
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the code context graph and print it.
    Analyze {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Output projection.
        #[arg(long, value_enum, default_value_t = OutputFormat::All)]
        format: OutputFormat,
    },
    /// Print the repository file tree.
    Tree {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Name shown on the first line; defaults to the directory name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a prompt for the documentation writer.
    Prompt {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value_t = PromptKind::Docs)]
        kind: PromptKind,
        /// Leave the API reference data out of the docs prompt.
        #[arg(long)]
        no_api: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Mermaid,
    Api,
    Json,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PromptKind {
    Readme,
    Docs,
}
