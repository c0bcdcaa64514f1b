//! # decipher-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the data structures shared by every stage of the
//! `decipher` pipeline: construct records produced by the structure analyzer,
//! findings produced by the obfuscation detector, and the explanation steps
//! both renderers hand to the presentation layer.
//!
//! ## What belongs here
//! * Pure data structs (records, findings, steps)
//! * Serialization/Deserialization logic
//! * Enums shared with the CLI (mode, dialect, highlight, output format)
//!
//! ## What does NOT belong here
//! * Parsing or pattern matching
//! * Rendering text
//! * CLI argument parsing

use std::fmt;

use serde::{Deserialize, Serialize};

/// The current schema version for the JSON `Explanation` document.
pub const SCHEMA_VERSION: u32 = 1;

// -----------------------------------------------------------------------------
// Structure analysis
// -----------------------------------------------------------------------------

/// The five construct categories the structure analyzer classifies.
///
/// Variants are declared in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    Loop,
    Conditional,
    Assignment,
    NestedFunction,
    VariableDeclaration,
}

impl ConstructKind {
    /// All kinds, in classification priority order.
    pub const ALL: [ConstructKind; 5] = [
        ConstructKind::Loop,
        ConstructKind::Conditional,
        ConstructKind::Assignment,
        ConstructKind::NestedFunction,
        ConstructKind::VariableDeclaration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructKind::Loop => "loop",
            ConstructKind::Conditional => "conditional",
            ConstructKind::Assignment => "assignment",
            ConstructKind::NestedFunction => "nested_function",
            ConstructKind::VariableDeclaration => "variable_declaration",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source position of a syntax node.
///
/// `line` is 1-based; `column` is the 0-based byte column within that line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub line: usize,
    pub column: usize,
}

/// One classified syntax node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructRecord {
    pub kind: ConstructKind,
    /// Discriminant of the matched node, e.g. `ForStatement`.
    pub node_type: String,
    /// Field-name tokens from the tree root to this node. Sequence elements
    /// contribute their index as a token.
    pub path: Vec<String>,
    pub span: Span,
}

/// Classified constructs, one ordered sequence per kind.
///
/// Records appear in pre-order, left-to-right encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub loops: Vec<ConstructRecord>,
    pub conditionals: Vec<ConstructRecord>,
    pub assignments: Vec<ConstructRecord>,
    pub functions: Vec<ConstructRecord>,
    pub variables: Vec<ConstructRecord>,
}

impl StructureAnalysis {
    /// Append a record to the sequence for its kind.
    pub fn push(&mut self, record: ConstructRecord) {
        match record.kind {
            ConstructKind::Loop => self.loops.push(record),
            ConstructKind::Conditional => self.conditionals.push(record),
            ConstructKind::Assignment => self.assignments.push(record),
            ConstructKind::NestedFunction => self.functions.push(record),
            ConstructKind::VariableDeclaration => self.variables.push(record),
        }
    }

    pub fn records(&self, kind: ConstructKind) -> &[ConstructRecord] {
        match kind {
            ConstructKind::Loop => &self.loops,
            ConstructKind::Conditional => &self.conditionals,
            ConstructKind::Assignment => &self.assignments,
            ConstructKind::NestedFunction => &self.functions,
            ConstructKind::VariableDeclaration => &self.variables,
        }
    }

    pub fn count(&self, kind: ConstructKind) -> usize {
        self.records(kind).len()
    }

    /// Total number of classified nodes across all categories.
    pub fn total(&self) -> usize {
        ConstructKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// -----------------------------------------------------------------------------
// Obfuscation detection
// -----------------------------------------------------------------------------

/// One detected instance of an obfuscation rule match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_name: String,
    pub explanation: String,
    pub example: String,
    /// Source text around the match with the match wrapped in a highlight marker.
    pub evidence_context: String,
    pub matched_text: String,
    /// Byte offset of the match in the analyzed source.
    pub offset: usize,
}

/// A user-supplied obfuscation rule, before its pattern is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRule {
    pub name: String,
    /// Pattern in `regex` crate syntax.
    pub pattern: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub example: String,
}

// -----------------------------------------------------------------------------
// Rendering
// -----------------------------------------------------------------------------

/// One titled unit of rendered explanation.
///
/// `content` may embed the markup subset: `\n` line breaks, `- ` list items
/// and `**bold**` spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationStep {
    pub title: String,
    pub content: String,
}

impl ExplanationStep {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// Enums shared with CLI and config
// -----------------------------------------------------------------------------

/// Which pipeline's output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    /// Explain loops, conditionals, assignments, functions and variables.
    #[default]
    Structure,
    /// Explain which obfuscation techniques the code uses.
    Obfuscation,
    /// Run both pipelines.
    Both,
}

impl AnalysisMode {
    pub fn includes_structure(&self) -> bool {
        matches!(self, AnalysisMode::Structure | AnalysisMode::Both)
    }

    pub fn includes_obfuscation(&self) -> bool {
        matches!(self, AnalysisMode::Obfuscation | AnalysisMode::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Structure => "structure",
            AnalysisMode::Obfuscation => "obfuscation",
            AnalysisMode::Both => "both",
        }
    }

    /// Parse a mode name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structure" => Some(AnalysisMode::Structure),
            "obfuscation" => Some(AnalysisMode::Obfuscation),
            "both" => Some(AnalysisMode::Both),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grammar accepted by the parser adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// JavaScript modules, including JSX.
    #[default]
    Javascript,
    /// TypeScript without JSX.
    Typescript,
    /// TypeScript with JSX.
    Tsx,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Javascript => "javascript",
            Dialect::Typescript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Some(Dialect::Javascript),
            "typescript" | "ts" => Some(Dialect::Typescript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker wrapped around the matched text inside an evidence context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum HighlightStyle {
    /// `**match**`, part of the content markup subset.
    #[default]
    Bold,
    /// An inline-styled HTML `<span>`, for callers that insert content as raw HTML.
    Html,
}

/// How the CLI prints explanation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Plain text with underlined titles.
    #[default]
    Text,
    /// Markdown headings with the raw content markup.
    Md,
    /// The full explanation document as JSON.
    Json,
    /// An HTML fragment.
    Html,
}
