use anyhow::{Context, Result};

use decipher_config::{self as cli, RulesFormat};
use decipher_core::{RuleInfo, Settings};

use crate::config::ResolvedConfig;

pub(crate) fn handle(args: cli::RulesArgs, resolved: &ResolvedConfig) -> Result<()> {
    let settings = Settings {
        rules: resolved.toml.obfuscation.rules.clone(),
        ..Settings::default()
    };
    let rules = decipher_core::rules(&settings).context("Failed to load obfuscation rules")?;

    let out = match args.format.unwrap_or_default() {
        RulesFormat::Text => text(&rules),
        RulesFormat::Json => serde_json::to_string_pretty(&rules)?,
    };
    println!("{out}");
    Ok(())
}

fn text(rules: &[RuleInfo]) -> String {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let mut block = format!("{}. {}\n   pattern: {}", i + 1, rule.name, rule.pattern);
            if !rule.explanation.is_empty() {
                block.push_str(&format!("\n   {}", rule.explanation));
            }
            if !rule.example.is_empty() {
                block.push_str(&format!("\n   example: {}", rule.example));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
