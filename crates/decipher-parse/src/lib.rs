//! # decipher-parse
//!
//! **Tier 1 (Parser Adapter)**
//!
//! Converts source text into an owned [`SyntaxTree`] using tree-sitter, or
//! into a [`ParseError`] when the text is not valid under the selected
//! grammar. The grammar is treated as a black box: only named, non-extra
//! nodes and their field names survive the conversion.
//!
//! ## Example
//!
//! ```
//! use decipher_parse::{parse, NodeKind};
//!
//! let tree = parse("let x = 1;").expect("valid source");
//! assert_eq!(tree.node(tree.root()).kind, NodeKind::Program);
//!
//! let err = parse("function( { ").unwrap_err();
//! assert!(err.message.starts_with("Unexpected token") || err.message.starts_with("Missing"));
//! ```

mod tree;

use decipher_types::{Dialect, Span};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use crate::tree::node_id;

pub use tree::{
    Field, FieldValue, NodeId, NodeKind, SyntaxNode, SyntaxTree, TreeBuilder, UNNAMED_FIELD,
};

/// Source text that could not be parsed.
///
/// `message` is meant to be shown to users verbatim; `line` (1-based) and
/// `column` (0-based) locate the first syntax error when known.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    fn at(message: impl Into<String>, node: &Node<'_>) -> Self {
        let point = node.start_position();
        let line = point.row + 1;
        let column = point.column;
        Self {
            message: format!("{} ({}:{})", message.into(), line, column),
            line: Some(line),
            column: Some(column),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

/// Parse JavaScript (module grammar, JSX allowed).
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    parse_with(source, Dialect::Javascript)
}

/// Parse source text under the given dialect.
pub fn parse_with(source: &str, dialect: Dialect) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language(dialect))
        .map_err(|err| ParseError::internal(format!("Failed to load {dialect} grammar: {err}")))?;

    let ts_tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::internal("Parser stopped before producing a syntax tree"))?;

    let root = ts_tree.root_node();
    if root.has_error() {
        let err = match first_syntax_error(root) {
            Some(node) if node.is_missing() => ParseError::at(format!("Missing {}", node.kind()), &node),
            Some(node) => ParseError::at("Unexpected token", &node),
            None => ParseError::at("Unexpected token", &root),
        };
        debug!(dialect = %dialect, error = %err, "source failed to parse");
        return Err(err);
    }

    let tree = lower(root, dialect);
    debug!(dialect = %dialect, nodes = tree.len(), "parsed source");
    Ok(tree)
}

fn language(dialect: Dialect) -> Language {
    match dialect {
        Dialect::Javascript => tree_sitter_javascript::LANGUAGE.into(),
        Dialect::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// First error or missing node in pre-order, descending only into subtrees
/// that contain an error.
fn first_syntax_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn span_of(node: &Node<'_>) -> Span {
    let start = node.start_position();
    Span {
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        line: start.row + 1,
        column: start.column,
    }
}

fn shell(node: &Node<'_>) -> SyntaxNode {
    SyntaxNode {
        kind: NodeKind::from_grammar(node.kind()),
        span: span_of(node),
        fields: Vec::new(),
    }
}

/// Convert a tree-sitter tree into the arena representation.
///
/// Named children are grouped by grammar field name (unnamed ones under
/// [`UNNAMED_FIELD`]). A named field holding exactly one child becomes a
/// single-node field; everything else is a sequence.
fn lower(root: Node<'_>, dialect: Dialect) -> SyntaxTree {
    let mut nodes = vec![shell(&root)];
    let mut work = vec![(root, 0usize)];

    while let Some((ts_node, index)) = work.pop() {
        let mut groups: Vec<(&'static str, Vec<NodeId>)> = Vec::new();
        let mut cursor = ts_node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if child.is_named() && !child.is_extra() {
                    let child_index = nodes.len();
                    nodes.push(shell(&child));
                    work.push((child, child_index));

                    let key = cursor.field_name().unwrap_or(UNNAMED_FIELD);
                    let id = node_id(child_index);
                    match groups.iter_mut().find(|(name, _)| *name == key) {
                        Some((_, ids)) => ids.push(id),
                        None => groups.push((key, vec![id])),
                    }
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        nodes[index].fields = groups
            .into_iter()
            .map(|(name, mut ids)| {
                if name != UNNAMED_FIELD && ids.len() == 1 {
                    Field::node(name, ids.remove(0))
                } else {
                    Field::sequence(name, ids)
                }
            })
            .collect();
    }

    SyntaxTree::from_arena(nodes, node_id(0), dialect)
}
