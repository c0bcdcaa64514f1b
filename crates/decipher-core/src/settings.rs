//! Pure settings types for binding-friendly API.
//!
//! These mirror the CLI options without any clap dependency, so library
//! consumers and the JSON entry point share one shape.

use serde::{Deserialize, Serialize};

use decipher_obfuscation::{DEFAULT_CONTEXT_RADIUS, DetectOptions, ObfuscationRule, RuleSet};
use decipher_types::{AnalysisMode, CustomRule, Dialect, HighlightStyle};

use crate::error::DecipherError;

/// Settings for one [`explain`](crate::explain) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: AnalysisMode,
    pub dialect: Dialect,
    /// Characters of evidence context on each side of a match.
    pub context_radius: usize,
    pub highlight: HighlightStyle,
    /// Report every match of a rule, not only the first.
    pub all_occurrences: bool,
    /// Include the raw structure analysis and findings in the result.
    pub include_details: bool,
    /// Rules appended after the built-in vocabulary.
    pub rules: Vec<CustomRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::default(),
            dialect: Dialect::default(),
            context_radius: DEFAULT_CONTEXT_RADIUS,
            highlight: HighlightStyle::default(),
            all_occurrences: false,
            include_details: false,
            rules: Vec::new(),
        }
    }
}

impl Settings {
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            context_radius: self.context_radius,
            highlight: self.highlight,
            all_occurrences: self.all_occurrences,
        }
    }

    /// The built-in rules followed by the custom ones.
    pub fn rule_set(&self) -> Result<RuleSet, DecipherError> {
        let custom = self
            .rules
            .iter()
            .map(|r| ObfuscationRule::new(&r.name, &r.pattern, &r.explanation, &r.example))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet::builtin().extended(custom))
    }
}
