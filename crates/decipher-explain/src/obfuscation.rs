//! Obfuscation renderer.

use decipher_types::{ExplanationStep, Finding};

use crate::plural;

pub const NONE_TITLE: &str = "No Obfuscation Detected";
pub const NONE_CONTENT: &str = "This code doesn't appear to use common obfuscation techniques. It might be regular code or use unusual obfuscation methods not in our detection patterns.";
pub const COUNT_TITLE: &str = "Obfuscation Techniques Found";
pub const MEANING_TITLE: &str = "What This Means";

const MEANING_CONTENT: &str = "This code uses obfuscation techniques that make it deliberately hard to read. This could be for several reasons:

**1.** To protect intellectual property (hiding how the code works)
**2.** To make the file size smaller (some obfuscation techniques reduce file size)
**3.** To prevent tampering with the code
**4.** In some cases, to hide malicious intent

While obfuscated code runs exactly the same as normal code, its purpose is hidden behind these techniques. If you didn't write this code yourself or get it from a trusted source, be cautious about running it, especially if it uses eval() or similar functions that can execute hidden code.";

/// Findings sharing a rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingGroup<'a> {
    pub rule_name: &'a str,
    pub explanation: &'a str,
    pub example: &'a str,
    pub instances: Vec<&'a Finding>,
}

/// Group findings by rule name, groups in order of first appearance.
pub fn group(findings: &[Finding]) -> Vec<FindingGroup<'_>> {
    let mut groups: Vec<FindingGroup<'_>> = Vec::new();
    for finding in findings {
        match groups.iter_mut().find(|g| g.rule_name == finding.rule_name) {
            Some(group) => group.instances.push(finding),
            None => groups.push(FindingGroup {
                rule_name: &finding.rule_name,
                explanation: &finding.explanation,
                example: &finding.example,
                instances: vec![finding],
            }),
        }
    }
    groups
}

pub fn render(findings: &[Finding]) -> Vec<ExplanationStep> {
    if findings.is_empty() {
        return vec![ExplanationStep::new(NONE_TITLE, NONE_CONTENT)];
    }

    let groups = group(findings);
    let mut steps = Vec::with_capacity(groups.len() + 2);

    steps.push(ExplanationStep::new(
        COUNT_TITLE,
        format!(
            "This code uses {} obfuscation {} to hide its true purpose. Obfuscation makes code deliberately difficult to understand, but we can break it down step by step.",
            groups.len(),
            plural(groups.len(), "technique", "techniques")
        ),
    ));

    for group in &groups {
        steps.push(ExplanationStep::new(
            format!("{} Obfuscation", group.rule_name),
            group_body(group),
        ));
    }

    steps.push(ExplanationStep::new(MEANING_TITLE, MEANING_CONTENT));
    steps
}

fn group_body(group: &FindingGroup<'_>) -> String {
    let count = group.instances.len();
    let mut body = format!(
        "{}\n\n**Example:** {}\n\n**Found in your code ({} {}):**",
        group.explanation,
        group.example,
        count,
        plural(count, "instance", "instances")
    );
    for (i, instance) in group.instances.iter().enumerate() {
        body.push_str(&format!("\n\n**Instance {}:**\n{}", i + 1, instance.evidence_context));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(rule: &str, context: &str) -> Finding {
        Finding {
            rule_name: rule.to_string(),
            explanation: format!("{rule} explained"),
            example: format!("{rule} example"),
            evidence_context: context.to_string(),
            matched_text: String::new(),
            offset: 0,
        }
    }

    #[test]
    fn no_findings_is_single_canned_step() {
        let steps = render(&[]);
        assert_eq!(steps, vec![ExplanationStep::new(NONE_TITLE, NONE_CONTENT)]);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let findings = [
            finding("Eval Function", "a"),
            finding("Hexadecimal Numbers", "b"),
            finding("Eval Function", "c"),
        ];
        let groups = group(&findings);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].rule_name, "Eval Function");
        assert_eq!(groups[0].instances.len(), 2);
        assert_eq!(groups[1].rule_name, "Hexadecimal Numbers");
    }

    #[test]
    fn single_technique_is_singular() {
        let steps = render(&[finding("Eval Function", "x")]);
        assert!(steps[0].content.starts_with("This code uses 1 obfuscation technique to hide"));
        assert!(steps[1].content.contains("(1 instance):"));
    }

    #[test]
    fn instances_are_numbered_within_a_group() {
        let steps = render(&[finding("Eval Function", "first"), finding("Eval Function", "second")]);
        assert_eq!(steps.len(), 3);
        let body = &steps[1].content;
        assert!(body.contains("(2 instances):"));
        assert!(body.contains("**Instance 1:**\nfirst"));
        assert!(body.contains("**Instance 2:**\nsecond"));
    }

    #[test]
    fn closing_step_cautions_about_eval() {
        let steps = render(&[finding("Eval Function", "x")]);
        let last = steps.last().unwrap();
        assert_eq!(last.title, MEANING_TITLE);
        assert!(last.content.contains("eval()"));
    }
}
