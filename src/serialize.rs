//! Text projections of a [`CodeContextGraph`]: a mermaid diagram, the API
//! index handed to the documentation writer, and a JSON snapshot.
//!
//! File nodes are labelled with the bare basename, `(("a.py"))`, with no
//! brackets around the name.

use crate::graph::{CodeContextGraph, EdgeKind, NodeKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

pub const DIAGRAM_HEADER: &str = "graph TD;";
pub const API_INDEX_HEADING: &str = "### API Reference Data";
pub const NO_DECLARATIONS: &str = "No functions or classes were found by the parser.";

/// Replaces characters that mermaid treats as syntax. Distinct ids can in
/// principle collide afterwards (`a.b` vs `a_b`); this is accepted.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|ch| match ch {
            ':' | '/' | '\\' | '.' => '_',
            other => other,
        })
        .collect()
}

pub fn to_diagram_text(graph: &CodeContextGraph) -> String {
    let mut out = String::new();
    out.push_str(DIAGRAM_HEADER);
    out.push('\n');

    for node in graph.nodes() {
        let id = sanitize_id(&node.id);
        // Writing into a String cannot fail.
        let _ = match node.kind {
            NodeKind::File => writeln!(out, "    {id}((\"{}\"))", node.name),
            NodeKind::Function => writeln!(out, "    {id}[/\"{}()\"/]", node.name),
            NodeKind::Class => writeln!(out, "    {id}[\"{}\"]", node.name),
        };
    }

    for (source, target, kind) in graph.edges() {
        let _ = writeln!(
            out,
            "    {} -- {kind} --> {}",
            sanitize_id(&source.id),
            sanitize_id(&target.id)
        );
    }
    out
}

#[derive(Default)]
struct FileApi<'a> {
    classes: Vec<&'a str>,
    functions: Vec<String>,
}

pub fn to_api_index_text(graph: &CodeContextGraph) -> String {
    let mut files: BTreeMap<&str, FileApi> = BTreeMap::new();
    for node in graph.nodes() {
        match node.kind {
            NodeKind::Function => files
                .entry(node.file.as_str())
                .or_default()
                .functions
                .push(format!("{}()", node.name)),
            NodeKind::Class => files
                .entry(node.file.as_str())
                .or_default()
                .classes
                .push(node.name.as_str()),
            NodeKind::File => {}
        }
    }

    if files.is_empty() {
        return NO_DECLARATIONS.to_string();
    }

    let mut out = format!("{API_INDEX_HEADING}\n\n");
    for (path, api) in &files {
        let _ = writeln!(out, "**File: `{path}`**");
        if !api.classes.is_empty() {
            let _ = writeln!(out, "  - Classes: {}", api.classes.join(", "));
        }
        if !api.functions.is_empty() {
            let _ = writeln!(out, "  - Functions: {}", api.functions.join(", "));
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Serialize)]
pub struct GraphSnapshot<'a> {
    pub nodes: Vec<&'a crate::graph::DeclNode>,
    pub edges: Vec<EdgeSnapshot<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EdgeSnapshot<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub kind: EdgeKind,
}

pub fn to_snapshot(graph: &CodeContextGraph) -> GraphSnapshot<'_> {
    GraphSnapshot {
        nodes: graph.nodes().collect(),
        edges: graph
            .edges()
            .map(|(source, target, kind)| EdgeSnapshot {
                source: &source.id,
                target: &target.id,
                kind,
            })
            .collect(),
    }
}

pub fn to_json(graph: &CodeContextGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_snapshot(graph))
}
