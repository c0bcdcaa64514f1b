//! # decipher-structure
//!
//! **Tier 2 (Analysis)**
//!
//! Walks a [`SyntaxTree`] and classifies every node into at most one of five
//! construct categories.
//!
//! ## Classification
//!
//! Each node is checked against the categories in a fixed priority order and
//! recorded under the first one that matches:
//!
//! 1. Loop: `for`, `while`, `do … while`
//! 2. Conditional: `if`, ternary `?:`
//! 3. Assignment: `=` and compound assignment operators
//! 4. Nested function: declarations, function expressions, arrow functions
//! 5. Variable declaration: `var`, `let`, `const`
//!
//! Unclassified nodes are not recorded, but their children are still visited.
//! The root is visited like any other node, so a top-level function
//! declaration counts as a nested function.
//!
//! ## Ordering
//!
//! Records within a category follow pre-order, left-to-right, field
//! declaration order. The walk uses an explicit stack and never recurses.

use decipher_parse::{FieldValue, NodeId, NodeKind, SyntaxTree};
use decipher_types::{ConstructKind, ConstructRecord, StructureAnalysis};
use tracing::debug;

/// Classify a node discriminant, first match wins.
pub fn classify(kind: &NodeKind) -> Option<ConstructKind> {
    match kind {
        NodeKind::ForStatement | NodeKind::WhileStatement | NodeKind::DoWhileStatement => {
            Some(ConstructKind::Loop)
        }
        NodeKind::IfStatement | NodeKind::ConditionalExpression => Some(ConstructKind::Conditional),
        NodeKind::AssignmentExpression => Some(ConstructKind::Assignment),
        NodeKind::FunctionDeclaration
        | NodeKind::FunctionExpression
        | NodeKind::ArrowFunctionExpression => Some(ConstructKind::NestedFunction),
        NodeKind::VariableDeclaration => Some(ConstructKind::VariableDeclaration),
        NodeKind::Program | NodeKind::Other(_) => None,
    }
}

/// Analyze the structure of a parsed tree.
pub fn analyze(tree: &SyntaxTree) -> StructureAnalysis {
    let mut analysis = StructureAnalysis::default();
    let mut visited = 0usize;

    // Children are pushed in reverse so they pop in declaration order.
    let mut stack: Vec<(NodeId, Vec<String>)> = vec![(tree.root(), Vec::new())];
    while let Some((id, path)) = stack.pop() {
        visited += 1;
        let node = tree.node(id);

        if let Some(kind) = classify(&node.kind) {
            analysis.push(ConstructRecord {
                kind,
                node_type: node.kind.to_string(),
                path: path.clone(),
                span: node.span,
            });
        }

        let mut children: Vec<(NodeId, Vec<String>)> = Vec::new();
        for field in &node.fields {
            match &field.value {
                FieldValue::Node(child) => {
                    children.push((*child, extend(&path, [field.name.clone()])));
                }
                FieldValue::Sequence(items) => {
                    for (index, child) in items.iter().enumerate() {
                        children.push((
                            *child,
                            extend(&path, [field.name.clone(), index.to_string()]),
                        ));
                    }
                }
            }
        }
        stack.extend(children.into_iter().rev());
    }

    debug!(
        nodes = visited,
        loops = analysis.loops.len(),
        conditionals = analysis.conditionals.len(),
        assignments = analysis.assignments.len(),
        functions = analysis.functions.len(),
        variables = analysis.variables.len(),
        "structure analysis complete"
    );
    analysis
}

fn extend<const N: usize>(path: &[String], tokens: [String; N]) -> Vec<String> {
    let mut next = Vec::with_capacity(path.len() + N);
    next.extend_from_slice(path);
    next.extend(tokens);
    next
}
