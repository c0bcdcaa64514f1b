//! # decipher-core
//!
//! This crate is the **primary library interface** for `decipher`.
//! It wires the parser, structure analyzer, obfuscation detector and
//! renderers into the two pipelines callers actually use.
//!
//! If you are embedding `decipher` into another Rust application, depend on
//! this crate and `decipher-types`.
//!
//! ## Example
//!
//! ```
//! use decipher_core::{analyze_obfuscation, analyze_structure};
//!
//! let steps = analyze_structure("function f(){ for(;;){ x = 1; } }").unwrap();
//! assert_eq!(steps.first().unwrap().title, "Function Structure");
//!
//! let steps = analyze_obfuscation("eval(atob(s))");
//! assert_eq!(steps[0].title, "Obfuscation Techniques Found");
//!
//! assert!(analyze_structure("function( { ").is_err());
//! ```

pub mod error;
pub mod ffi;
mod settings;

use serde::{Deserialize, Serialize};
use tracing::debug;

use decipher_obfuscation::{RuleSet, detect, detect_with};
use decipher_parse::{ParseError, SyntaxTree, parse_with};
use decipher_types::{
    AnalysisMode, Dialect, ExplanationStep, Finding, SCHEMA_VERSION, StructureAnalysis,
};

pub use decipher_types as types;
pub use error::{DecipherError, ErrorCode};
pub use settings::Settings;

/// Explain the structure of JavaScript source.
///
/// Fails only when the source does not parse; the parser message is
/// returned unchanged.
pub fn analyze_structure(source: &str) -> Result<Vec<ExplanationStep>, ParseError> {
    analyze_structure_with(source, Dialect::Javascript)
}

pub fn analyze_structure_with(
    source: &str,
    dialect: Dialect,
) -> Result<Vec<ExplanationStep>, ParseError> {
    run_structure(source, dialect, decipher_structure::analyze).map(|(_, steps)| steps)
}

/// Explain which obfuscation techniques the source uses. Never fails.
pub fn analyze_obfuscation(source: &str) -> Vec<ExplanationStep> {
    decipher_explain::obfuscation::render(&detect(source, RuleSet::builtin()))
}

/// Parse, then analyze and render. The analyzer only runs on a parsed tree.
fn run_structure<F>(
    source: &str,
    dialect: Dialect,
    analyzer: F,
) -> Result<(StructureAnalysis, Vec<ExplanationStep>), ParseError>
where
    F: FnOnce(&SyntaxTree) -> StructureAnalysis,
{
    let tree = parse_with(source, dialect)?;
    let analysis = analyzer(&tree);
    let steps = decipher_explain::structure::render(&analysis);
    Ok((analysis, steps))
}

/// Tool identification stamped on every [`Explanation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            name: "decipher".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Result of a mode-dispatched run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub schema_version: u32,
    pub tool: ToolInfo,
    pub mode: AnalysisMode,
    pub dialect: Dialect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<Vec<ExplanationStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscation: Option<Vec<ExplanationStep>>,
    /// Set in `both` mode when the source did not parse; the obfuscation
    /// steps are still produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<ParseError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<StructureAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<Finding>>,
}

impl Explanation {
    /// All steps in display order: structure first, then obfuscation.
    pub fn steps(&self) -> impl Iterator<Item = &ExplanationStep> {
        self.structure
            .iter()
            .flatten()
            .chain(self.obfuscation.iter().flatten())
    }
}

/// Run the pipelines selected by `settings.mode`.
///
/// In `structure` mode a parse failure is an error. In `both` mode it is
/// recorded in [`Explanation::parse_error`] and obfuscation still runs.
pub fn explain(source: &str, settings: &Settings) -> Result<Explanation, DecipherError> {
    let mut explanation = Explanation {
        schema_version: SCHEMA_VERSION,
        tool: ToolInfo::default(),
        mode: settings.mode,
        dialect: settings.dialect,
        structure: None,
        obfuscation: None,
        parse_error: None,
        analysis: None,
        findings: None,
    };

    if settings.mode.includes_structure() {
        match run_structure(source, settings.dialect, decipher_structure::analyze) {
            Ok((analysis, steps)) => {
                explanation.structure = Some(steps);
                if settings.include_details {
                    explanation.analysis = Some(analysis);
                }
            }
            Err(err) if settings.mode == AnalysisMode::Both => {
                debug!(error = %err, "structure skipped, obfuscation continues");
                explanation.parse_error = Some(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    if settings.mode.includes_obfuscation() {
        let rules = settings.rule_set()?;
        let findings = detect_with(source, &rules, &settings.detect_options());
        explanation.obfuscation = Some(decipher_explain::obfuscation::render(&findings));
        if settings.include_details {
            explanation.findings = Some(findings);
        }
    }

    debug!(
        mode = %settings.mode,
        steps = explanation.steps().count(),
        "explanation ready"
    );
    Ok(explanation)
}

/// One entry of the rule vocabulary, as listed by `decipher rules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub name: String,
    pub pattern: String,
    pub explanation: String,
    pub example: String,
}

/// The effective rule vocabulary for `settings`, in reporting order.
pub fn rules(settings: &Settings) -> Result<Vec<RuleInfo>, DecipherError> {
    Ok(settings
        .rule_set()?
        .iter()
        .map(|r| RuleInfo {
            name: r.name().to_string(),
            pattern: r.pattern().to_string(),
            explanation: r.explanation().to_string(),
            example: r.example().to_string(),
        })
        .collect())
}
