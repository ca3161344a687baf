use anyhow::{Result, bail};
use std::fmt::Write;
use std::path::Path;

use crate::extractor::build_walker;
use crate::util;

pub const IGNORED_FILES: &[&str] = &[".DS_Store"];
pub const NO_README: &str = "No README.md file found.";

/// Renders the repository layout, one entry per line, sorted by name,
/// depth-first and indented four spaces per level.
pub fn build_file_tree(root: &Path, repo_name: &str, extra_ignore: &[String]) -> Result<String> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    let mut out = String::new();
    writeln!(out, "{repo_name}/")?;

    for entry in build_walker(root, extra_ignore) {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                log::warn!("walk error: {err}");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if !is_dir && IGNORED_FILES.contains(&name.as_str()) {
            continue;
        }
        let indent = "    ".repeat(entry.depth() - 1);
        let suffix = if is_dir { "/" } else { "" };
        writeln!(out, "{indent}|-- {name}{suffix}")?;
    }
    Ok(out)
}

/// Contents of the root `README.md`, or a fixed note when there is none.
pub fn read_readme(root: &Path) -> String {
    let path = root.join("README.md");
    if !path.is_file() {
        return NO_README.to_string();
    }
    match util::read_lossy(&path) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("could not read {}: {err}", path.display());
            NO_README.to_string()
        }
    }
}

/// `https://github.com/org/tool.git` -> `tool`.
pub fn repo_name_from_url(url: &str) -> String {
    let last = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Display name for a local checkout: its directory name.
pub fn repo_name_from_path(root: &Path) -> String {
    let canonical = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| util::normalize_path(root))
}
