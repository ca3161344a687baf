//! Code Context Graph: files, functions and classes joined by `defines` edges.
//!
//! The graph only grows. Inserting a node or edge that already exists is a
//! no-op, so identifiers stay unique within a run.

use crate::error::{AnalyzeError, Result};
use crate::util;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Function,
    Class,
}

impl NodeKind {
    fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Function => "func",
            NodeKind::Class => "class",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::File => "file",
            NodeKind::Function => "function",
            NodeKind::Class => "class",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Defines,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Defines => f.write_str("defines"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclNode {
    pub id: String,
    pub kind: NodeKind,
    /// Basename for files, bare identifier for functions and classes.
    pub name: String,
    /// Relative path of the file this node is, or is declared in.
    pub file: String,
}

impl DeclNode {
    pub fn file(rel_path: &str) -> Self {
        Self {
            id: file_node_id(rel_path),
            kind: NodeKind::File,
            name: util::basename(rel_path).to_string(),
            file: rel_path.to_string(),
        }
    }

    pub fn declaration(kind: NodeKind, rel_path: &str, name: &str) -> Self {
        Self {
            id: node_id(kind, rel_path, name),
            kind,
            name: name.to_string(),
            file: rel_path.to_string(),
        }
    }
}

pub fn file_node_id(rel_path: &str) -> String {
    format!("file:{rel_path}")
}

pub fn node_id(kind: NodeKind, rel_path: &str, name: &str) -> String {
    match kind {
        NodeKind::File => file_node_id(rel_path),
        _ => format!("{}:{}:{name}", kind.id_prefix(), file_node_id(rel_path)),
    }
}

#[derive(Debug, Default)]
pub struct CodeContextGraph {
    graph: DiGraph<DeclNode, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl CodeContextGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` unless a node with the same id is already present.
    /// Returns the index and whether the node was new.
    pub fn add_node(&mut self, node: DeclNode) -> (NodeIndex, bool) {
        if let Some(&idx) = self.index.get(&node.id) {
            return (idx, false);
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        (idx, true)
    }

    pub fn add_file(&mut self, rel_path: &str) -> NodeIndex {
        self.add_node(DeclNode::file(rel_path)).0
    }

    /// Adds an edge between two existing nodes. Returns `false` when the edge
    /// was already present.
    pub fn add_edge(&mut self, source_id: &str, target_id: &str, kind: EdgeKind) -> Result<bool> {
        let source = self.index_of(source_id)?;
        let target = self.index_of(target_id)?;
        if self
            .graph
            .edges_connecting(source, target)
            .any(|edge| *edge.weight() == kind)
        {
            return Ok(false);
        }
        self.graph.add_edge(source, target, kind);
        Ok(true)
    }

    /// Records a function or class declared in `rel_path` together with its
    /// `defines` edge. The file node must already exist.
    pub fn add_declaration(&mut self, rel_path: &str, kind: NodeKind, name: &str) -> Result<()> {
        let file_id = file_node_id(rel_path);
        self.index_of(&file_id)?;
        let node = DeclNode::declaration(kind, rel_path, name);
        let target_id = node.id.clone();
        self.add_node(node);
        self.add_edge(&file_id, &target_id, EdgeKind::Defines)?;
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| AnalyzeError::MissingNode(id.to_string()))
    }

    pub fn node(&self, id: &str) -> Option<&DeclNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DeclNode> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&DeclNode, &DeclNode, EdgeKind)> {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()], *edge.weight()))
    }

    pub fn files(&self) -> impl Iterator<Item = &DeclNode> {
        self.nodes().filter(|node| node.kind == NodeKind::File)
    }

    /// Declarations reached from the file's node over `defines` edges.
    pub fn declarations_in(&self, rel_path: &str) -> Vec<&DeclNode> {
        let Some(&idx) = self.index.get(&file_node_id(rel_path)) else {
            return Vec::new();
        };
        let mut out: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == EdgeKind::Defines)
            .map(|edge| edge.target())
            .collect();
        // petgraph walks adjacency lists newest first
        out.sort();
        out.into_iter().map(|target| &self.graph[target]).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
