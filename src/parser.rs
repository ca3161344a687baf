//! Thin adapter over tree-sitter for the python grammar.
//!
//! Compiled queries are cached by pattern text for as long as the
//! [`SyntaxParser`] lives, so the extractor compiles each pattern once per run
//! instead of once per file.

use crate::error::{AnalyzeError, Result};
use std::collections::HashMap;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

pub const FUNCTION_NAME_QUERY: &str = "(function_definition name: (identifier) @func.name)";
pub const CLASS_NAME_QUERY: &str = "(class_definition name: (identifier) @class.name)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// One named capture produced by a structural query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub capture_name: String,
    pub text: String,
    pub span: Span,
}

pub struct SyntaxParser {
    parser: Parser,
    language: Language,
    queries: HashMap<String, Query>,
}

impl SyntaxParser {
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        Ok(Self {
            parser,
            language,
            queries: HashMap::new(),
        })
    }

    /// Parses source text. Local syntax errors still produce a tree with
    /// error nodes; only a parser that yields nothing at all is an error.
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser.parse(source, None).ok_or(AnalyzeError::Parse)
    }

    pub fn compile_query(&mut self, pattern: &str) -> Result<&Query> {
        if !self.queries.contains_key(pattern) {
            let query = Query::new(&self.language, pattern).map_err(|err| {
                AnalyzeError::QueryCompile {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                }
            })?;
            self.queries.insert(pattern.to_string(), query);
        }
        self.queries
            .get(pattern)
            .ok_or_else(|| AnalyzeError::QueryCompile {
                pattern: pattern.to_string(),
                message: "query missing from cache".to_string(),
            })
    }

    pub fn cached_queries(&self) -> usize {
        self.queries.len()
    }

    /// Runs `pattern` (compiling it on first use) against the whole tree.
    pub fn query(&mut self, tree: &Tree, source: &str, pattern: &str) -> Result<Vec<Capture>> {
        let query = self.compile_query(pattern)?;
        Ok(collect_captures(query, tree.root_node(), source))
    }
}

fn collect_captures(query: &Query, root: Node, source: &str) -> Vec<Capture> {
    let mut cursor = QueryCursor::new();
    let mut out = Vec::new();
    let names = query.capture_names();
    let mut matches = cursor.matches(query, root, source.as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            let Ok(text) = node.utf8_text(source.as_bytes()) else {
                continue;
            };
            out.push(Capture {
                capture_name: names[capture.index as usize].to_string(),
                text: text.to_string(),
                span: Span {
                    start_byte: node.start_byte(),
                    end_byte: node.end_byte(),
                    start_line: node.start_position().row + 1,
                    end_line: node.end_position().row + 1,
                },
            });
        }
    }
    out
}
