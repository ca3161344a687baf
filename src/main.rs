use anyhow::{Context, Result, bail};
use clap::Parser;
use repodoc::cli::{self, OutputFormat, PromptKind};
use repodoc::config::Config;
use repodoc::{Analyzer, ScanOptions, prompt, repo_map, serialize};
use std::path::{Path, PathBuf};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}

fn checked_repo(repo: PathBuf) -> Result<PathBuf> {
    if !repo.is_dir() {
        bail!("repository root {} is not a directory", repo.display());
    }
    Ok(repo)
}

fn repo_name(repo: &Path, name: Option<String>) -> String {
    name.unwrap_or_else(|| repo_map::repo_name_from_path(repo))
}

fn main() -> Result<()> {
    init_logging();
    let args = cli::Args::parse();
    let config = Config::get();

    match args.command {
        cli::Command::Analyze { repo, format } => {
            let repo = checked_repo(repo)?;
            let mut analyzer = Analyzer::new(repo, ScanOptions::from_config(config))?;
            let graph = analyzer.analyze()?;
            match format {
                OutputFormat::Mermaid => print!("{}", serialize::to_diagram_text(&graph)),
                OutputFormat::Api => println!("{}", serialize::to_api_index_text(&graph)),
                OutputFormat::Json => println!(
                    "{}",
                    serialize::to_json(&graph).context("serialize graph")?
                ),
                OutputFormat::All => {
                    println!("{}", serialize::to_diagram_text(&graph));
                    println!("{}", serialize::to_api_index_text(&graph));
                }
            }
            Ok(())
        }
        cli::Command::Tree { repo, name } => {
            let repo = checked_repo(repo)?;
            let name = repo_name(&repo, name);
            let tree = repo_map::build_file_tree(&repo, &name, &config.extra_ignore)?;
            print!("{tree}");
            Ok(())
        }
        cli::Command::Prompt {
            repo,
            name,
            kind,
            no_api,
        } => {
            let repo = checked_repo(repo)?;
            let readme = repo_map::read_readme(&repo);
            match kind {
                PromptKind::Readme => {
                    let text = prompt::readme_summary_prompt(&readme)
                        .unwrap_or_else(|| prompt::EMPTY_README.to_string());
                    println!("{text}");
                }
                PromptKind::Docs => {
                    let name = repo_name(&repo, name);
                    let file_tree = repo_map::build_file_tree(&repo, &name, &config.extra_ignore)?;
                    let mut analyzer = Analyzer::new(&repo, ScanOptions::from_config(config))?;
                    let graph = analyzer.analyze()?;
                    let diagram = serialize::to_diagram_text(&graph);
                    let api_index = serialize::to_api_index_text(&graph);
                    let summary = if readme.trim().is_empty() {
                        prompt::EMPTY_README
                    } else {
                        readme.as_str()
                    };
                    let inputs = prompt::DocInputs {
                        repo_name: &name,
                        readme_summary: summary,
                        file_tree: &file_tree,
                        diagram: &diagram,
                        api_index: (!no_api).then_some(api_index.as_str()),
                    };
                    println!("{}", prompt::final_docs_prompt(&inputs));
                }
            }
            Ok(())
        }
    }
}
