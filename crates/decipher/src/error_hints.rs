use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    let haystack = chain.join(" | ").to_ascii_lowercase();
    let mut out: Vec<String> = Vec::new();

    if haystack.contains("[parse_failure]") {
        push_hint(
            &mut out,
            "Check that the input is complete JavaScript, or pick another grammar with `--dialect typescript` or `--dialect tsx`.",
        );
        push_hint(
            &mut out,
            "Use `--mode obfuscation` (or `--mode both`) to scan code that does not parse.",
        );
    }

    if haystack.contains("[invalid_rule]") {
        push_hint(
            &mut out,
            "Check the `pattern` of each `[[obfuscation.rules]]` entry; patterns use Rust regex syntax (no look-around or backreferences).",
        );
        push_hint(&mut out, "List the active rules with `decipher rules`.");
    }

    if haystack.contains("failed to read") && haystack.contains("no such file or directory") {
        push_hint(&mut out, "Verify the input path exists and is readable.");
        push_hint(&mut out, "Pass `-` or omit FILE to read the source from stdin.");
    }

    if haystack.contains("stream did not contain valid utf-8") {
        push_hint(&mut out, "The input must be UTF-8 encoded text.");
    }

    if haystack.contains("config file") && haystack.contains("parse") {
        push_hint(
            &mut out,
            "Check `decipher.toml` syntax and key names; unknown keys are rejected.",
        );
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}
