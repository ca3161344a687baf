//! Builds documentation inputs for a checked-out repository: a code context
//! graph of python files, functions and classes, its mermaid and API index
//! projections, a file tree, and the prompts that tie them together.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod parser;
pub mod prompt;
pub mod repo_map;
pub mod serialize;
pub mod util;

pub use error::AnalyzeError;
pub use extractor::{Analyzer, ScanOptions, analyze};
pub use graph::{CodeContextGraph, DeclNode, EdgeKind, NodeKind};
