//! # decipher-config
//!
//! **Tier 4 (Configuration)**
//!
//! This crate defines the CLI arguments and the `decipher.toml` schema.
//!
//! ## What belongs here
//! * Clap `Parser`, `Args`, `Subcommand` structs
//! * Configuration file struct definitions (Serde)
//! * Config file discovery
//!
//! ## What does NOT belong here
//! * Analysis logic
//! * Merging CLI flags with file values (the CLI crate does that)

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use clap_complete::Shell;
pub use decipher_types::{AnalysisMode, CustomRule, Dialect, HighlightStyle, OutputFormat};

/// Project-local config file name.
pub const CONFIG_FILE_NAME: &str = "decipher.toml";

/// `decipher`: explain what a piece of JavaScript does and how it is obfuscated.
///
/// Default mode (no subcommand) explains FILE, or stdin when FILE is absent or `-`.
#[derive(Parser, Debug)]
#[command(name = "decipher", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Options for the implicit `explain` mode (when no subcommand is provided).
    #[command(flatten)]
    pub explain: ExplainArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Read settings from this TOML file instead of searching for one.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (repeat for more detail).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Explain a source file (default).
    Explain(ExplainArgs),

    /// List the obfuscation rules in reporting order.
    Rules(RulesArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExplainArgs {
    /// Source file to explain. Reads stdin when absent or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Which explanation to produce [default: structure].
    #[arg(long, value_enum)]
    pub mode: Option<AnalysisMode>,

    /// Grammar used to parse the source [default: javascript].
    #[arg(long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Output format [default: text].
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Marker wrapped around matched text in evidence snippets [default: bold].
    #[arg(long, value_enum)]
    pub highlight: Option<HighlightStyle>,

    /// Characters of evidence context on each side of a match [default: 20].
    #[arg(long, value_name = "N")]
    pub context_radius: Option<usize>,

    /// Report every match of a rule instead of only the first.
    #[arg(long)]
    pub all_occurrences: bool,

    /// Include the raw structure analysis and findings (JSON output only).
    #[arg(long)]
    pub details: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RulesArgs {
    /// Output format [default: text].
    #[arg(long, value_enum)]
    pub format: Option<RulesFormat>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RulesFormat {
    /// One block per rule.
    #[default]
    Text,
    /// A JSON array.
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

// =============================================================================
// TOML Configuration File Structures
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root TOML configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    /// Pipeline selection and output.
    pub analysis: AnalysisConfig,

    /// Obfuscation detector settings and custom rules.
    pub obfuscation: ObfuscationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// "structure", "obfuscation" or "both".
    pub mode: Option<AnalysisMode>,

    /// "javascript", "typescript" or "tsx".
    pub dialect: Option<Dialect>,

    /// "text", "md", "json" or "html".
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObfuscationConfig {
    pub context_radius: Option<usize>,

    /// "bold" or "html".
    pub highlight: Option<HighlightStyle>,

    pub all_occurrences: Option<bool>,

    /// Extra rules, reported after the built-in ones in this order.
    pub rules: Vec<CustomRule>,
}

impl TomlConfig {
    /// Load configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load configuration from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Per-user config file: `<config dir>/decipher/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("decipher").join("config.toml"))
}

/// Find and load the config file.
///
/// An explicit path must exist. Otherwise `decipher.toml` in `cwd` wins over
/// the per-user file; when neither exists the result is `None`.
pub fn discover(
    explicit: Option<&Path>,
    cwd: &Path,
    user_config: Option<&Path>,
) -> Result<Option<(PathBuf, TomlConfig)>, ConfigError> {
    if let Some(path) = explicit {
        return TomlConfig::from_file(path).map(|c| Some((path.to_path_buf(), c)));
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    let candidates = std::iter::once(local).chain(user_config.map(Path::to_path_buf));
    for path in candidates {
        if path.is_file() {
            let config = TomlConfig::from_file(&path)?;
            return Ok(Some((path, config)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["decipher"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.explain.file.is_none());
        assert_eq!(cli.global.verbose, 0);
    }

    #[test]
    fn implicit_explain_takes_file_and_flags() {
        let cli = Cli::try_parse_from([
            "decipher",
            "--mode",
            "both",
            "--context-radius",
            "8",
            "-vv",
            "app.js",
        ])
        .unwrap();
        assert_eq!(cli.explain.mode, Some(AnalysisMode::Both));
        assert_eq!(cli.explain.context_radius, Some(8));
        assert_eq!(cli.explain.file, Some(PathBuf::from("app.js")));
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn completions_accept_clap_complete_shell_names() {
        let cli = Cli::try_parse_from(["decipher", "completions", "powershell"]).unwrap();
        match cli.command {
            Some(Commands::Completions(args)) => assert_eq!(args.shell, Shell::PowerShell),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["decipher", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn rules_subcommand_parses_format() {
        let cli = Cli::try_parse_from(["decipher", "rules", "--format", "json"]).unwrap();
        match cli.command {
            Some(Commands::Rules(args)) => assert_eq!(args.format, Some(RulesFormat::Json)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_works_after_subcommand() {
        let cli =
            Cli::try_parse_from(["decipher", "explain", "--config", "x.toml", "a.js"]).unwrap();
        assert_eq!(cli.global.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        assert_eq!(TomlConfig::parse("").unwrap(), TomlConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(TomlConfig::parse("[analysis]\nmood = \"happy\"\n").is_err());
    }
}
