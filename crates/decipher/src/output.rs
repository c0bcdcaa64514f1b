//! Step rendering for the four output formats.

use anyhow::Result;

use decipher_config::OutputFormat;
use decipher_core::Explanation;
use decipher_core::types::ExplanationStep;
use decipher_explain::markup;

pub(crate) fn render(explanation: &Explanation, format: OutputFormat) -> Result<String> {
    let steps: Vec<&ExplanationStep> = explanation.steps().collect();
    let out = match format {
        OutputFormat::Text => text(&steps),
        OutputFormat::Md => md(&steps),
        OutputFormat::Json => serde_json::to_string_pretty(explanation)?,
        OutputFormat::Html => html(&steps),
    };
    Ok(out)
}

fn text(steps: &[&ExplanationStep]) -> String {
    steps
        .iter()
        .map(|step| {
            let rule = "=".repeat(step.title.chars().count());
            format!("{}\n{}\n{}", step.title, rule, markup::to_plain(&step.content))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn md(steps: &[&ExplanationStep]) -> String {
    steps
        .iter()
        .map(|step| format!("## {}\n\n{}", step.title, step.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn html(steps: &[&ExplanationStep]) -> String {
    let mut out = String::from("<div class=\"decipher\">\n");
    for step in steps {
        out.push_str("<section class=\"decipher-step\">\n<h2>");
        out.push_str(&markup::escape_html(&step.title));
        out.push_str("</h2>\n");
        out.push_str(&markup::to_html(&step.content));
        out.push_str("\n</section>\n");
    }
    out.push_str("</div>");
    out
}
