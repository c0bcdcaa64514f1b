//! # decipher-obfuscation
//!
//! **Tier 2 (Analysis)**
//!
//! Runs an ordered list of text-pattern rules against raw source and reports
//! which obfuscation techniques it uses. Works on text only, so malformed
//! code is never an error.
//!
//! ## What belongs here
//! * The built-in rule vocabulary and custom rule validation
//! * Match search and evidence-context extraction
//!
//! ## What does NOT belong here
//! * Grouping or rendering findings (see `decipher-explain`)
//! * Parsing
//!
//! ## Example
//!
//! ```
//! use decipher_obfuscation::{detect, RuleSet};
//!
//! let findings = detect("var _0x1a2b=['a','b']; eval(x)", RuleSet::builtin());
//! let names: Vec<&str> = findings.iter().map(|f| f.rule_name.as_str()).collect();
//! assert_eq!(names, ["String Array", "Eval Function"]);
//! ```

mod rules;

use decipher_types::{Finding, HighlightStyle};
use tracing::{debug, trace};

pub use rules::{ObfuscationRule, RuleError, RuleSet};

/// Characters of context kept on each side of a match by default.
pub const DEFAULT_CONTEXT_RADIUS: usize = 20;

const HTML_HIGHLIGHT_OPEN: &str = r#"<span style="background-color: #ffff00; font-weight: bold;">"#;
const HTML_HIGHLIGHT_CLOSE: &str = "</span>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectOptions {
    /// Characters (not bytes) of context on each side of the match.
    pub context_radius: usize,
    pub highlight: HighlightStyle,
    /// Report every non-overlapping match instead of the first one only.
    pub all_occurrences: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            context_radius: DEFAULT_CONTEXT_RADIUS,
            highlight: HighlightStyle::Bold,
            all_occurrences: false,
        }
    }
}

/// Detect obfuscation with default options: first match per rule, 20
/// characters of context, bold highlight.
pub fn detect(source: &str, rules: &RuleSet) -> Vec<Finding> {
    detect_with(source, rules, &DetectOptions::default())
}

/// Detect obfuscation, one finding per matching rule in rule order (or one
/// per match with `all_occurrences`).
///
/// Each rule scans the whole source independently. Zero-length matches are
/// ignored.
pub fn detect_with(source: &str, rules: &RuleSet, options: &DetectOptions) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule in rules {
        let matches = rule
            .matcher()
            .find_iter(source)
            .filter(|m| !m.is_empty())
            .take(if options.all_occurrences { usize::MAX } else { 1 });

        for m in matches {
            trace!(rule = rule.name(), offset = m.start(), "rule matched");
            findings.push(Finding {
                rule_name: rule.name().to_string(),
                explanation: rule.explanation().to_string(),
                example: rule.example().to_string(),
                evidence_context: evidence_context(
                    source,
                    m.start(),
                    m.end(),
                    options.context_radius,
                    options.highlight,
                ),
                matched_text: m.as_str().to_string(),
                offset: m.start(),
            });
        }
    }

    debug!(
        rules = rules.len(),
        findings = findings.len(),
        bytes = source.len(),
        "obfuscation detection complete"
    );
    findings
}

/// The match at `start..end` with up to `radius` characters on either side,
/// clamped to the text, the match itself wrapped in the highlight marker.
///
/// With [`HighlightStyle::Bold`] the result is explanation markup: source
/// text goes through [`escape_markup`], and a match spanning several lines
/// is bolded line by line so every `**` pair stays on one line.
///
/// `start` and `end` must lie on character boundaries.
pub fn evidence_context(
    source: &str,
    start: usize,
    end: usize,
    radius: usize,
    highlight: HighlightStyle,
) -> String {
    let from = source[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = source[end..]
        .char_indices()
        .nth(radius)
        .map_or(source.len(), |(i, _)| end + i);

    match highlight {
        HighlightStyle::Bold => bold_context(
            &source[from..start],
            &source[start..end],
            &source[end..to],
        ),
        HighlightStyle::Html => {
            let mut out = String::with_capacity(
                to - from + HTML_HIGHLIGHT_OPEN.len() + HTML_HIGHLIGHT_CLOSE.len(),
            );
            out.push_str(&source[from..start]);
            out.push_str(HTML_HIGHLIGHT_OPEN);
            out.push_str(&source[start..end]);
            out.push_str(HTML_HIGHLIGHT_CLOSE);
            out.push_str(&source[end..to]);
            out
        }
    }
}

/// Escape text for the explanation markup subset: `\` and `*` get a
/// backslash so they never read as escapes or bold markers.
///
/// A leading `- ` is not touched here since it only matters at the start of
/// a line; [`evidence_context`] handles that on the assembled context.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn bold_context(before: &str, matched: &str, after: &str) -> String {
    let highlighted = matched
        .split('\n')
        .map(|segment| {
            if segment.is_empty() {
                String::new()
            } else {
                format!("**{}**", escape_markup(segment))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let context = format!(
        "{}{}{}",
        escape_markup(before),
        highlighted,
        escape_markup(after)
    );
    context
        .split('\n')
        .map(|line| match line.strip_prefix("- ") {
            Some(rest) => format!("\\- {rest}"),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_clamped_at_text_bounds() {
        let ctx = evidence_context("a 0x1F b", 2, 6, 20, HighlightStyle::Bold);
        assert_eq!(ctx, "a **0x1F** b");
    }

    #[test]
    fn context_keeps_radius_characters_each_side() {
        let source = format!("{}eval({})", "x".repeat(30), "y".repeat(30));
        let ctx = evidence_context(&source, 30, 35, 20, HighlightStyle::Bold);
        assert_eq!(ctx, format!("{}**eval(**{}", "x".repeat(20), "y".repeat(20)));
    }

    #[test]
    fn context_counts_characters_not_bytes() {
        let source = "ééé eval(x)";
        let start = source.find("eval(").unwrap();
        let ctx = evidence_context(source, start, start + 5, 2, HighlightStyle::Bold);
        assert_eq!(ctx, "é **eval(**x)");
    }

    #[test]
    fn zero_radius_is_just_the_match() {
        let ctx = evidence_context("abc eval( def", 4, 9, 0, HighlightStyle::Bold);
        assert_eq!(ctx, "**eval(**");
    }

    #[test]
    fn html_highlight_uses_inline_span() {
        let ctx = evidence_context("eval(", 0, 5, 20, HighlightStyle::Html);
        assert_eq!(
            ctx,
            r#"<span style="background-color: #ffff00; font-weight: bold;">eval(</span>"#
        );
    }

    #[test]
    fn highlight_marks_the_real_match_not_an_earlier_repeat() {
        // Only the second `0x1` is at a word boundary.
        let source = "_0x1 + 0x1";
        let findings = detect(source, RuleSet::builtin());
        let hex = findings
            .iter()
            .find(|f| f.rule_name == "Hexadecimal Numbers")
            .unwrap();
        assert_eq!(hex.offset, 7);
        assert_eq!(hex.evidence_context, "_0x1 + **0x1**");
    }

    #[test]
    fn source_stars_and_backslashes_are_escaped() {
        let source = "y = 2 ** 3; eval(z)";
        let start = source.find("eval(").unwrap();
        let ctx = evidence_context(source, start, start + 5, 20, HighlightStyle::Bold);
        assert_eq!(ctx, r"y = 2 \*\* 3; **eval(**z)");

        let ctx = evidence_context(r"s = '\x41'", 5, 9, 20, HighlightStyle::Bold);
        assert_eq!(ctx, r"s = '**\\x41**'");
    }

    #[test]
    fn multi_line_match_is_bolded_per_line() {
        let source = "var a = ['x',\n'y'];";
        let ctx = evidence_context(source, 0, source.len() - 1, 20, HighlightStyle::Bold);
        assert_eq!(ctx, "**var a = ['x',**\n**'y']**;");

        let ctx = evidence_context("a\n\nb", 0, 4, 0, HighlightStyle::Bold);
        assert_eq!(ctx, "**a**\n\n**b**");
    }

    #[test]
    fn leading_dash_is_escaped_per_line() {
        let source = "x;\n- 1; eval(a)";
        let start = source.find("eval(").unwrap();
        let ctx = evidence_context(source, start, start + 5, 20, HighlightStyle::Bold);
        assert_eq!(ctx, "x;\n\\- 1; **eval(**a)");
    }

    #[test]
    fn empty_matches_are_skipped() {
        let empty = ObfuscationRule::new("Anything", "z*", "", "").unwrap();
        let rules = RuleSet::new(vec![empty]);
        assert!(detect("abc", &rules).is_empty());
        assert_eq!(detect("azzc", &rules)[0].matched_text, "zz");
    }
}
