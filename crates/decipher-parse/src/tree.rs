//! Owned syntax tree.
//!
//! Nodes live in an arena and reference their children by [`NodeId`], so the
//! tree can be built, walked and dropped without recursion no matter how deep
//! the source nests.

use std::fmt;

use decipher_types::{Dialect, Span};

/// Field name used for children the grammar does not name.
pub const UNNAMED_FIELD: &str = "children";

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

pub(crate) fn node_id(index: usize) -> NodeId {
    NodeId(index)
}

/// Node discriminant.
///
/// Only the discriminants the structure analyzer classifies get their own
/// variant; every other grammar node is `Other` with its raw grammar tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    ForStatement,
    WhileStatement,
    DoWhileStatement,
    IfStatement,
    ConditionalExpression,
    AssignmentExpression,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
    VariableDeclaration,
    Other(String),
}

impl NodeKind {
    /// Map a tree-sitter grammar tag to a discriminant.
    pub fn from_grammar(tag: &str) -> Self {
        match tag {
            "program" => NodeKind::Program,
            "for_statement" => NodeKind::ForStatement,
            "while_statement" => NodeKind::WhileStatement,
            "do_statement" => NodeKind::DoWhileStatement,
            "if_statement" => NodeKind::IfStatement,
            "ternary_expression" => NodeKind::ConditionalExpression,
            "assignment_expression" | "augmented_assignment_expression" => {
                NodeKind::AssignmentExpression
            }
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration
            }
            "function_expression" | "function" | "generator_function" => {
                NodeKind::FunctionExpression
            }
            "arrow_function" => NodeKind::ArrowFunctionExpression,
            "variable_declaration" | "lexical_declaration" => NodeKind::VariableDeclaration,
            other => NodeKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::AssignmentExpression => "AssignmentExpression",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::FunctionExpression => "FunctionExpression",
            NodeKind::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a node field: one child, or an ordered sequence of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Node(NodeId),
    Sequence(Vec<NodeId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    pub fn node(name: impl Into<String>, id: NodeId) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Node(id),
        }
    }

    pub fn sequence(name: impl Into<String>, ids: Vec<NodeId>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Sequence(ids),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

/// Immutable syntax tree produced by the parser adapter.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
    dialect: Dialect,
}

impl SyntaxTree {
    pub(crate) fn from_arena(nodes: Vec<SyntaxNode>, root: NodeId, dialect: Dialect) -> Self {
        Self {
            nodes,
            root,
            dialect,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in arena order (not traversal order).
    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter()
    }
}

/// Builds a [`SyntaxTree`] by hand, children before parents.
///
/// A node can only reference nodes that already exist, so trees built this
/// way are acyclic.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.node(kind, Vec::new())
    }

    pub fn node(&mut self, kind: NodeKind, fields: Vec<Field>) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug_assert!(
            fields.iter().all(|f| match &f.value {
                FieldValue::Node(child) => child.0 < id.0,
                FieldValue::Sequence(children) => children.iter().all(|c| c.0 < id.0),
            }),
            "children must be added before their parent"
        );
        self.nodes.push(SyntaxNode {
            kind,
            span: Span::default(),
            fields,
        });
        id
    }

    pub fn finish(self, root: NodeId, dialect: Dialect) -> SyntaxTree {
        SyntaxTree::from_arena(self.nodes, root, dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_tags_map_to_discriminants() {
        assert_eq!(NodeKind::from_grammar("for_statement"), NodeKind::ForStatement);
        assert_eq!(NodeKind::from_grammar("do_statement"), NodeKind::DoWhileStatement);
        assert_eq!(
            NodeKind::from_grammar("augmented_assignment_expression"),
            NodeKind::AssignmentExpression
        );
        assert_eq!(
            NodeKind::from_grammar("lexical_declaration"),
            NodeKind::VariableDeclaration
        );
        assert_eq!(
            NodeKind::from_grammar("for_in_statement"),
            NodeKind::Other("for_in_statement".to_string())
        );
    }

    #[test]
    fn other_kind_displays_raw_tag() {
        assert_eq!(NodeKind::from_grammar("call_expression").to_string(), "call_expression");
        assert_eq!(NodeKind::ArrowFunctionExpression.to_string(), "ArrowFunctionExpression");
    }

    #[test]
    fn builder_links_children() {
        let mut b = TreeBuilder::new();
        let a = b.leaf(NodeKind::AssignmentExpression);
        let root = b.node(NodeKind::Program, vec![Field::sequence(UNNAMED_FIELD, vec![a])]);
        let tree = b.finish(root, Dialect::Javascript);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(tree.root()).kind, NodeKind::Program);
        match &tree.node(root).fields[0].value {
            FieldValue::Sequence(ids) => assert_eq!(ids, &vec![a]),
            other => panic!("unexpected field value {other:?}"),
        }
    }
}
