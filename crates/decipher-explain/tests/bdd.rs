// BDD-style scenario tests for decipher-explain

use decipher_explain::{markup, obfuscation, structure};
use decipher_obfuscation::{RuleSet, detect};
use decipher_types::{ConstructKind, ConstructRecord, ExplanationStep, Finding, Span, StructureAnalysis};

fn analysis(counts: [usize; 5]) -> StructureAnalysis {
    let mut analysis = StructureAnalysis::default();
    for (kind, n) in ConstructKind::ALL.into_iter().zip(counts) {
        for _ in 0..n {
            analysis.push(ConstructRecord {
                kind,
                node_type: String::new(),
                path: vec![],
                span: Span::default(),
            });
        }
    }
    analysis
}

fn titles(steps: &[ExplanationStep]) -> Vec<&str> {
    steps.iter().map(|s| s.title.as_str()).collect()
}

// ── Scenario: structure rendering ───────────────────────────────────

#[test]
fn given_every_category_present_when_rendered_then_seven_steps_in_fixed_order() {
    let steps = structure::render(&analysis([1, 1, 1, 1, 1]));
    assert_eq!(
        titles(&steps),
        [
            "Function Structure",
            "Variable Declarations",
            "Loop Analysis",
            "Conditional Logic",
            "Data Manipulation",
            "Nested Functions",
            "Function Purpose",
        ]
    );
}

#[test]
fn given_only_loops_when_rendered_then_three_steps() {
    let steps = structure::render(&analysis([4, 0, 0, 0, 0]));
    assert_eq!(
        titles(&steps),
        ["Function Structure", "Loop Analysis", "Function Purpose"]
    );
    assert!(steps[1].content.contains("4 loops"));
}

#[test]
fn given_counts_when_rendered_then_overview_lists_every_category_with_count() {
    let steps = structure::render(&analysis([2, 0, 3, 0, 1]));
    let overview = &steps[0].content;
    assert!(overview.starts_with("This function contains:"));
    assert!(overview.contains("- **2 loops**"));
    assert!(overview.contains("- **0 conditional statements**"));
    assert!(overview.contains("- **3 assignments**"));
    assert!(overview.contains("- **0 nested functions**"));
    assert!(overview.contains("- **1 variable declaration**"));
}

#[test]
fn given_zero_and_nonzero_counts_when_rendered_then_descriptors_differ() {
    let with_loop = structure::render(&analysis([1, 0, 0, 0, 0]));
    let without = structure::render(&analysis([0, 0, 0, 0, 0]));
    let line = |steps: &[ExplanationStep]| {
        steps[0]
            .content
            .lines()
            .find(|l| l.contains("loop"))
            .unwrap()
            .split_once(": ")
            .unwrap()
            .1
            .to_string()
    };
    assert_ne!(line(&with_loop), line(&without));
}

#[test]
fn given_any_analysis_when_rendered_then_step_count_between_two_and_seven() {
    for mask in 0u8..32 {
        let counts = std::array::from_fn(|i| usize::from(mask >> i & 1));
        let steps = structure::render(&analysis(counts));
        let present = counts.iter().filter(|c| **c > 0).count();
        assert_eq!(steps.len(), 2 + present, "mask {mask:05b}");
    }
}

// ── Scenario: obfuscation rendering ─────────────────────────────────

#[test]
fn given_no_findings_when_rendered_then_single_no_obfuscation_step() {
    let steps = obfuscation::render(&detect("", RuleSet::builtin()));
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].title, "No Obfuscation Detected");
}

#[test]
fn given_string_array_and_eval_when_rendered_then_four_steps() {
    let findings = detect("var _0x1a2b=['a','b'];\neval(x)", RuleSet::builtin());
    let steps = obfuscation::render(&findings);
    assert_eq!(
        titles(&steps),
        [
            "Obfuscation Techniques Found",
            "String Array Obfuscation",
            "Eval Function Obfuscation",
            "What This Means",
        ]
    );
    assert!(steps[0].content.contains("2 obfuscation techniques"));
}

#[test]
fn given_repeated_rule_findings_when_rendered_then_grouped_under_one_step() {
    let finding = |ctx: &str| Finding {
        rule_name: "Eval Function".to_string(),
        explanation: "Runs text as code.".to_string(),
        example: "eval('1')".to_string(),
        evidence_context: ctx.to_string(),
        matched_text: "eval(".to_string(),
        offset: 0,
    };
    let steps = obfuscation::render(&[finding("**eval(**a)"), finding("**eval(**b)")]);

    assert_eq!(steps.len(), 3);
    assert!(steps[0].content.contains("1 obfuscation technique "));
    assert!(steps[1].content.contains("**Instance 1:**\n**eval(**a)"));
    assert!(steps[1].content.contains("**Instance 2:**\n**eval(**b)"));
}

#[test]
fn given_same_findings_when_rendered_twice_then_byte_identical() {
    let findings = detect("var a = 0x1; eval(a)", RuleSet::builtin());
    assert_eq!(obfuscation::render(&findings), obfuscation::render(&findings));
}

// ── Scenario: markup interpretation ─────────────────────────────────

#[test]
fn given_rendered_step_when_converted_to_plain_then_no_bold_markers_remain() {
    for step in structure::render(&analysis([1, 2, 0, 1, 3])) {
        assert!(!markup::to_plain(&step.content).contains("**"));
    }
}

#[test]
fn given_evidence_with_html_when_converted_to_html_then_source_is_escaped() {
    let findings = detect("eval('<b>')", RuleSet::builtin());
    let steps = obfuscation::render(&findings);
    let html = markup::to_html(&steps[1].content);
    assert!(html.contains("<strong>eval(</strong>&#x27;&lt;b&gt;&#x27;)"));
    assert!(!html.contains("<b>"));
}

#[test]
fn given_exponent_operator_in_context_when_converted_then_only_match_is_bold() {
    let findings = detect("y = 2 ** 3; eval(z)", RuleSet::builtin());
    let steps = obfuscation::render(&findings);
    assert_eq!(steps[1].title, "Eval Function Obfuscation");

    let html = markup::to_html(&steps[1].content);
    assert!(html.contains("y = 2 ** 3; <strong>eval(</strong>z)"));
    let plain = markup::to_plain(&steps[1].content);
    assert!(plain.contains("y = 2 ** 3; eval(z)"));
}

#[test]
fn given_match_spanning_lines_when_converted_then_markers_do_not_leak() {
    let findings = detect("var a = ['x',\n'y'];", RuleSet::builtin());
    let steps = obfuscation::render(&findings);
    assert_eq!(steps[1].title, "String Array Obfuscation");

    let plain = markup::to_plain(&steps[1].content);
    assert!(plain.contains("var a = ['x',\n'y'];"));
    assert!(!plain.contains("**"));

    let html = markup::to_html(&steps[1].content);
    assert!(html.contains(
        "<strong>var a = [&#x27;x&#x27;,</strong><br><strong>&#x27;y&#x27;]</strong>;"
    ));
}

#[test]
fn given_evidence_line_starting_with_dash_when_converted_then_not_a_list() {
    let findings = detect("x = 1;\n- 1; eval(z)", RuleSet::builtin());
    let steps = obfuscation::render(&findings);
    let html = markup::to_html(&steps[1].content);
    assert!(html.contains("<br>- 1; <strong>eval(</strong>z)"));
    assert!(!html.contains("<li>"));
}
