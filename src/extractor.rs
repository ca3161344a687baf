use crate::config::Config;
use crate::error::{AnalyzeError, Result};
use crate::graph::{CodeContextGraph, NodeKind};
use crate::parser::{CLASS_NAME_QUERY, FUNCTION_NAME_QUERY, SyntaxParser};
use crate::util;
use ignore::{Walk, WalkBuilder};
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory names that are never descended into.
pub const IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    ".venv",
    "venv",
    "__pycache__",
    ".vscode",
];

pub const SOURCE_EXTENSION: &str = "py";

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_file_bytes: u64,
    pub extra_ignore: Vec<String>,
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_file_bytes: config.max_file_bytes,
            extra_ignore: config.extra_ignore.clone(),
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files: usize,
    pub parsed: usize,
    pub failed: usize,
}

/// Walker over `root` that prunes ignored directories before descending.
/// `.gitignore` rules and hidden-file filtering are off: only the fixed
/// ignore set (plus `extra_ignore`) decides what is skipped.
pub(crate) fn build_walker(root: &Path, extra_ignore: &[String]) -> Walk {
    let extra = extra_ignore.to_vec();
    WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| !is_ignored_dir(entry, &extra))
        .build()
}

fn is_ignored_dir(entry: &ignore::DirEntry, extra: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
        return false;
    }
    let name = entry.file_name();
    IGNORED_DIRS.iter().any(|dir| name == OsStr::new(dir))
        || extra.iter().any(|dir| name == OsStr::new(dir))
}

/// Symlinks count when they resolve to a file. Directory links are never
/// descended since the walker does not follow links.
fn is_regular_or_linked_file(entry: &ignore::DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
}

/// Lists every non-ignored source file under `root`, in walk order.
pub fn scan_sources(root: &Path, options: &ScanOptions) -> Vec<SourceFile> {
    let mut files = Vec::new();
    for entry in build_walker(root, &options.extra_ignore) {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {}", AnalyzeError::from(err));
                continue;
            }
        };
        let path = entry.path();
        if !is_regular_or_linked_file(&entry) {
            continue;
        }
        if !is_source_file(path) {
            continue;
        }
        let rel_path = match util::normalize_rel_path(root, path) {
            Ok(value) => value,
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                continue;
            }
        };
        files.push(SourceFile {
            rel_path,
            abs_path: path.to_path_buf(),
        });
    }
    files
}

/// Builds a [`CodeContextGraph`] for one repository checkout.
pub struct Analyzer {
    root: PathBuf,
    parser: SyntaxParser,
    options: ScanOptions,
    stats: ScanStats,
}

impl Analyzer {
    /// Fails only when the grammar or the declaration queries cannot be loaded.
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Result<Self> {
        let root = root.into();
        let root = fs::canonicalize(&root).unwrap_or(root);
        let mut parser = SyntaxParser::new()?;
        parser.compile_query(FUNCTION_NAME_QUERY)?;
        parser.compile_query(CLASS_NAME_QUERY)?;
        Ok(Self {
            root,
            parser,
            options,
            stats: ScanStats::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Counters from the most recent [`Analyzer::analyze`] call.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn analyze(&mut self) -> Result<CodeContextGraph> {
        info!("starting repository analysis of {}", self.root.display());
        let mut graph = CodeContextGraph::new();
        let mut stats = ScanStats::default();

        for file in scan_sources(&self.root, &self.options) {
            stats.files += 1;
            graph.add_file(&file.rel_path);
            match self.extract_file(&file, &mut graph) {
                Ok(declared) => {
                    stats.parsed += 1;
                    debug!("{}: {declared} declarations", file.rel_path);
                }
                Err(err) if err.is_per_file() => {
                    stats.failed += 1;
                    warn!("skipping declarations in {}: {err}", file.rel_path);
                }
                Err(err) => return Err(err),
            }
        }

        self.stats = stats;
        info!(
            "repository analysis complete: {} files ({} parsed, {} failed), {} nodes, {} edges",
            stats.files,
            stats.parsed,
            stats.failed,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn extract_file(&mut self, file: &SourceFile, graph: &mut CodeContextGraph) -> Result<usize> {
        let source = self.read_source(&file.abs_path)?;
        let tree = self
            .parser
            .parse(&source)
            .map_err(|_| AnalyzeError::FileParse {
                path: file.abs_path.clone(),
            })?;

        let mut declared = 0;
        for (pattern, kind) in [
            (FUNCTION_NAME_QUERY, NodeKind::Function),
            (CLASS_NAME_QUERY, NodeKind::Class),
        ] {
            for capture in self.parser.query(&tree, &source, pattern)? {
                graph.add_declaration(&file.rel_path, kind, &capture.text)?;
                declared += 1;
            }
        }
        Ok(declared)
    }

    fn read_source(&self, path: &Path) -> Result<String> {
        let read_error = |source| AnalyzeError::FileRead {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(read_error)?.len();
        if size > self.options.max_file_bytes {
            return Err(read_error(io::Error::other(format!(
                "{size} bytes exceeds limit of {}",
                self.options.max_file_bytes
            ))));
        }
        util::read_lossy(path).map_err(read_error)
    }
}

/// Analyzes `root` with options taken from the environment.
pub fn analyze(root: &Path) -> Result<CodeContextGraph> {
    Analyzer::new(root, ScanOptions::from_config(Config::get()))?.analyze()
}
