//! Property-based tests for the config schema.

use decipher_config::{AnalysisMode, CustomRule, Dialect, HighlightStyle, OutputFormat, TomlConfig};
use proptest::prelude::*;

fn arb_mode() -> impl Strategy<Value = Option<AnalysisMode>> {
    prop::option::of(prop_oneof![
        Just(AnalysisMode::Structure),
        Just(AnalysisMode::Obfuscation),
        Just(AnalysisMode::Both),
    ])
}

fn arb_dialect() -> impl Strategy<Value = Option<Dialect>> {
    prop::option::of(prop_oneof![
        Just(Dialect::Javascript),
        Just(Dialect::Typescript),
        Just(Dialect::Tsx),
    ])
}

fn arb_format() -> impl Strategy<Value = Option<OutputFormat>> {
    prop::option::of(prop_oneof![
        Just(OutputFormat::Text),
        Just(OutputFormat::Md),
        Just(OutputFormat::Json),
        Just(OutputFormat::Html),
    ])
}

fn arb_rule() -> impl Strategy<Value = CustomRule> {
    ("[A-Za-z ]{1,16}", "[a-z\\\\s()*+]{1,12}", "[ -~]{0,24}", "[ -~]{0,24}").prop_map(
        |(name, pattern, explanation, example)| CustomRule {
            name,
            pattern,
            explanation,
            example,
        },
    )
}

fn arb_config() -> impl Strategy<Value = TomlConfig> {
    (
        arb_mode(),
        arb_dialect(),
        arb_format(),
        prop::option::of(0usize..500),
        prop::option::of(prop_oneof![Just(HighlightStyle::Bold), Just(HighlightStyle::Html)]),
        prop::option::of(any::<bool>()),
        prop::collection::vec(arb_rule(), 0..4),
    )
        .prop_map(
            |(mode, dialect, format, radius, highlight, all, rules)| {
                let mut config = TomlConfig::default();
                config.analysis.mode = mode;
                config.analysis.dialect = dialect;
                config.analysis.format = format;
                config.obfuscation.context_radius = radius;
                config.obfuscation.highlight = highlight;
                config.obfuscation.all_occurrences = all;
                config.obfuscation.rules = rules;
                config
            },
        )
}

proptest! {
    #[test]
    fn serialized_config_parses_back_identically(config in arb_config()) {
        let text = toml::to_string(&config).expect("serializable");
        let parsed = TomlConfig::parse(&text).expect("parses");
        prop_assert_eq!(parsed, config);
    }

    #[test]
    fn parse_never_panics(input in "[ -~\\n]{0,200}") {
        let _ = TomlConfig::parse(&input);
    }
}
