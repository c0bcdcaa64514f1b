//! Fuzz target for the obfuscation detector.
//!
//! Validates:
//! - No panics on arbitrary UTF-8 input, including multi-byte characters
//!   near evidence-window edges
//! - Every finding points at its matched text
//! - Built-in rules report at most one finding each by default

#![no_main]

use decipher_obfuscation::{DetectOptions, RuleSet, detect, detect_with};
use decipher_types::HighlightStyle;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let rules = RuleSet::builtin();

    let findings = detect(source, rules);
    assert!(findings.len() <= rules.len());
    for finding in &findings {
        assert!(!finding.matched_text.is_empty());
        assert_eq!(
            &source[finding.offset..finding.offset + finding.matched_text.len()],
            finding.matched_text
        );
    }
    assert_eq!(findings, detect(source, rules));

    let options = DetectOptions {
        context_radius: data.first().map_or(0, |b| usize::from(*b % 40)),
        highlight: HighlightStyle::Html,
        all_occurrences: true,
    };
    let all = detect_with(source, rules, &options);
    assert!(all.len() >= findings.len());
});
