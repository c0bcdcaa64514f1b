use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use decipher_config::{self as cli, OutputFormat, TomlConfig};
use decipher_core::Settings;

/// The config file in effect for this run, if any.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub path: Option<PathBuf>,
    pub toml: TomlConfig,
}

pub(crate) fn load(explicit: Option<&Path>, cwd: &Path) -> Result<ResolvedConfig> {
    let user = cli::user_config_path();
    let resolved = match cli::discover(explicit, cwd, user.as_deref())? {
        Some((path, toml)) => {
            debug!(path = %path.display(), "loaded config");
            ResolvedConfig {
                path: Some(path),
                toml,
            }
        }
        None => {
            debug!("no config file, using defaults");
            ResolvedConfig::default()
        }
    };
    Ok(resolved)
}

/// Merge CLI flags over the config file over the built-in defaults.
pub fn resolve_settings(
    args: &cli::ExplainArgs,
    config: &TomlConfig,
) -> (Settings, OutputFormat) {
    let defaults = Settings::default();
    let analysis = &config.analysis;
    let obfuscation = &config.obfuscation;

    let settings = Settings {
        mode: args.mode.or(analysis.mode).unwrap_or(defaults.mode),
        dialect: args.dialect.or(analysis.dialect).unwrap_or(defaults.dialect),
        context_radius: args
            .context_radius
            .or(obfuscation.context_radius)
            .unwrap_or(defaults.context_radius),
        highlight: args
            .highlight
            .or(obfuscation.highlight)
            .unwrap_or(defaults.highlight),
        all_occurrences: args.all_occurrences
            || obfuscation
                .all_occurrences
                .unwrap_or(defaults.all_occurrences),
        include_details: args.details,
        rules: obfuscation.rules.clone(),
    };
    let format = args.format.or(analysis.format).unwrap_or_default();
    (settings, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use decipher_config::{AnalysisMode, Dialect, HighlightStyle};

    #[test]
    fn defaults_when_nothing_is_set() {
        let (settings, format) = resolve_settings(&cli::ExplainArgs::default(), &TomlConfig::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(format, OutputFormat::Text);
    }

    #[test]
    fn config_fills_unset_flags() {
        let toml = TomlConfig::parse(
            "[analysis]\nmode = \"both\"\nformat = \"md\"\n[obfuscation]\ncontext_radius = 4\nall_occurrences = true\n",
        )
        .unwrap();
        let (settings, format) = resolve_settings(&cli::ExplainArgs::default(), &toml);
        assert_eq!(settings.mode, AnalysisMode::Both);
        assert_eq!(settings.context_radius, 4);
        assert!(settings.all_occurrences);
        assert_eq!(format, OutputFormat::Md);
    }

    #[test]
    fn flags_win_over_config() {
        let toml = TomlConfig::parse(
            "[analysis]\nmode = \"both\"\ndialect = \"tsx\"\n[obfuscation]\nhighlight = \"html\"\n",
        )
        .unwrap();
        let args = cli::ExplainArgs {
            mode: Some(AnalysisMode::Obfuscation),
            dialect: Some(Dialect::Typescript),
            highlight: Some(HighlightStyle::Bold),
            format: Some(OutputFormat::Json),
            ..Default::default()
        };
        let (settings, format) = resolve_settings(&args, &toml);
        assert_eq!(settings.mode, AnalysisMode::Obfuscation);
        assert_eq!(settings.dialect, Dialect::Typescript);
        assert_eq!(settings.highlight, HighlightStyle::Bold);
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn custom_rules_come_from_config() {
        let toml = TomlConfig::parse(
            "[[obfuscation.rules]]\nname = \"Atob\"\npattern = 'atob\\('\n",
        )
        .unwrap();
        let (settings, _) = resolve_settings(&cli::ExplainArgs::default(), &toml);
        assert_eq!(settings.rules.len(), 1);
        assert_eq!(settings.rules[0].name, "Atob");
    }
}
