//! Structure renderer.
//!
//! Output is always an overview step, then one step per non-empty category
//! in a fixed order, then a purpose summary: two to seven steps in total.

use decipher_types::{ConstructKind, ExplanationStep, StructureAnalysis};

use crate::plural;

pub const OVERVIEW_TITLE: &str = "Function Structure";
pub const PURPOSE_TITLE: &str = "Function Purpose";

/// Category steps in output order, independent of counts.
pub const CATEGORY_ORDER: [ConstructKind; 5] = [
    ConstructKind::VariableDeclaration,
    ConstructKind::Loop,
    ConstructKind::Conditional,
    ConstructKind::Assignment,
    ConstructKind::NestedFunction,
];

/// Overview bullets in output order.
const OVERVIEW_ORDER: [ConstructKind; 5] = [
    ConstructKind::Loop,
    ConstructKind::Conditional,
    ConstructKind::Assignment,
    ConstructKind::NestedFunction,
    ConstructKind::VariableDeclaration,
];

pub fn render(analysis: &StructureAnalysis) -> Vec<ExplanationStep> {
    let mut steps = vec![overview(analysis)];
    for kind in CATEGORY_ORDER {
        let count = analysis.count(kind);
        if count > 0 {
            steps.push(ExplanationStep::new(category_title(kind), category_body(kind, count)));
        }
    }
    steps.push(ExplanationStep::new(PURPOSE_TITLE, purpose(analysis)));
    steps
}

pub fn category_title(kind: ConstructKind) -> &'static str {
    match kind {
        ConstructKind::VariableDeclaration => "Variable Declarations",
        ConstructKind::Loop => "Loop Analysis",
        ConstructKind::Conditional => "Conditional Logic",
        ConstructKind::Assignment => "Data Manipulation",
        ConstructKind::NestedFunction => "Nested Functions",
    }
}

fn noun(kind: ConstructKind, count: usize) -> &'static str {
    match kind {
        ConstructKind::Loop => plural(count, "loop", "loops"),
        ConstructKind::Conditional => {
            plural(count, "conditional statement", "conditional statements")
        }
        ConstructKind::Assignment => plural(count, "assignment", "assignments"),
        ConstructKind::NestedFunction => plural(count, "nested function", "nested functions"),
        ConstructKind::VariableDeclaration => {
            plural(count, "variable declaration", "variable declarations")
        }
    }
}

fn descriptor(kind: ConstructKind, present: bool) -> &'static str {
    match (kind, present) {
        (ConstructKind::Loop, true) => "some work is repeated",
        (ConstructKind::Loop, false) => "the code runs straight through without repeating",
        (ConstructKind::Conditional, true) => "the code makes decisions",
        (ConstructKind::Conditional, false) => "the code always follows the same path",
        (ConstructKind::Assignment, true) => "stored values get updated",
        (ConstructKind::Assignment, false) => "no stored values are changed",
        (ConstructKind::NestedFunction, true) => "work is split into smaller functions",
        (ConstructKind::NestedFunction, false) => "no functions are defined inside",
        (ConstructKind::VariableDeclaration, true) => "values are given names",
        (ConstructKind::VariableDeclaration, false) => "no new variables are introduced",
    }
}

fn overview(analysis: &StructureAnalysis) -> ExplanationStep {
    let mut content = String::from("This function contains:");
    for kind in OVERVIEW_ORDER {
        let count = analysis.count(kind);
        content.push_str(&format!(
            "\n- **{} {}**: {}",
            count,
            noun(kind, count),
            descriptor(kind, count > 0)
        ));
    }
    ExplanationStep::new(OVERVIEW_TITLE, content)
}

fn category_body(kind: ConstructKind, count: usize) -> String {
    let n = noun(kind, count);
    match kind {
        ConstructKind::VariableDeclaration => format!(
            "The function has {count} {n}. Variables may be used for temporary storage or counters."
        ),
        ConstructKind::Loop => format!(
            "The function contains {count} {n}, which may indicate iteration over data or repeated operations."
        ),
        ConstructKind::Conditional => format!(
            "The function contains {count} {n}. Conditionals control the flow based on certain conditions."
        ),
        ConstructKind::Assignment => format!(
            "The function manipulates data through {count} {n}, potentially transforming inputs."
        ),
        ConstructKind::NestedFunction => format!(
            "The code defines {count} {n}. Functions inside other code usually package a piece of work as a helper or a callback."
        ),
    }
}

fn purpose(analysis: &StructureAnalysis) -> String {
    let has = |kind| analysis.count(kind) > 0;
    let loops = has(ConstructKind::Loop);
    let conditionals = has(ConstructKind::Conditional);
    let assignments = has(ConstructKind::Assignment);
    let functions = has(ConstructKind::NestedFunction);
    let variables = has(ConstructKind::VariableDeclaration);

    if analysis.is_empty() {
        return "Based on the analysis, this code contains none of the constructs we look for. It is probably a simple expression or a call into other code.".to_string();
    }

    let mut text = String::from("Based on the analysis, this function appears to be designed ");
    text.push_str(match (loops, conditionals, assignments) {
        (true, _, true) => "for data transformation or processing.",
        (true, _, false) => "to walk through data, for example to search, check or count items.",
        (false, true, true) => "to make decisions and store the results, for example to validate input or pick a value.",
        (false, true, false) => "to choose between different outcomes based on its inputs.",
        (false, false, true) => "to set up or update stored values.",
        (false, false, false) if functions => "to organize its work into smaller helper functions.",
        (false, false, false) => "to give names to values for later use.",
    });

    if loops && conditionals {
        text.push_str(" Conditional logic inside it treats some values differently from others.");
    }
    if functions && (loops || conditionals || assignments) {
        text.push_str(" It also defines helper functions that do part of the work.");
    }
    if variables && !functions && (loops || conditionals || assignments) {
        text.push_str(" Named variables hold the values it works with.");
    }

    text.push_str("\n\nThis is an inference from the code's shape, not a guarantee of what it does.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use decipher_types::{ConstructRecord, Span};

    fn analysis_with(counts: &[(ConstructKind, usize)]) -> StructureAnalysis {
        let mut analysis = StructureAnalysis::default();
        for (kind, n) in counts {
            for _ in 0..*n {
                analysis.push(ConstructRecord {
                    kind: *kind,
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

    #[test]
    fn empty_analysis_gives_two_steps() {
        let steps = render(&StructureAnalysis::default());
        assert_eq!(titles(&steps), [OVERVIEW_TITLE, PURPOSE_TITLE]);
        assert!(steps[0].content.contains("**0 loops**"));
    }

    #[test]
    fn category_steps_use_fixed_order() {
        let analysis = analysis_with(&[
            (ConstructKind::NestedFunction, 1),
            (ConstructKind::Loop, 2),
            (ConstructKind::VariableDeclaration, 3),
        ]);
        assert_eq!(
            titles(&render(&analysis)),
            [
                OVERVIEW_TITLE,
                "Variable Declarations",
                "Loop Analysis",
                "Nested Functions",
                PURPOSE_TITLE
            ]
        );
    }

    #[test]
    fn counts_are_pluralized() {
        let analysis = analysis_with(&[(ConstructKind::Loop, 1), (ConstructKind::Assignment, 2)]);
        let steps = render(&analysis);
        assert!(steps[1].content.starts_with("The function contains 1 loop,"));
        assert!(steps[2].content.contains("through 2 assignments,"));
    }

    #[test]
    fn loops_and_assignments_read_as_processing() {
        let analysis = analysis_with(&[(ConstructKind::Loop, 1), (ConstructKind::Assignment, 1)]);
        let steps = render(&analysis);
        assert!(steps.last().unwrap().content.contains("data transformation or processing"));
    }

    #[test]
    fn functions_only_read_as_helpers() {
        let analysis = analysis_with(&[(ConstructKind::NestedFunction, 2)]);
        let purpose = render(&analysis).pop().unwrap().content;
        assert!(purpose.contains("smaller helper functions"));
        assert!(!purpose.contains("It also defines"));
    }
}
