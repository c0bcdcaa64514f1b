//! FFI-friendly JSON entrypoint for language bindings.
//!
//! This module provides a single `run_json` function that accepts
//! a mode string and JSON arguments, returning a JSON result.
//!
//! ## Response Envelope
//!
//! All responses use a consistent envelope format:
//! - Success: `{"ok": true, "data": {...}}`
//! - Error: `{"ok": false, "error": {"code": "...", "message": "...", "details": ...}}`
//!
//! ## Strict Parsing
//!
//! - Missing keys use sensible defaults (`source` is required for analysis modes)
//! - Invalid values return errors (no silent fallback to defaults)

use serde_json::Value;

use decipher_types::{AnalysisMode, CustomRule, Dialect, HighlightStyle, SCHEMA_VERSION};

use crate::error::{DecipherError, ResponseEnvelope};
use crate::settings::Settings;
use crate::{explain, rules};

/// Run a decipher operation with JSON arguments, returning JSON output.
///
/// # Arguments
///
/// * `mode` - `"structure"`, `"obfuscation"`, `"both"`, `"rules"` or `"version"`
/// * `args_json` - JSON object with the arguments
///
/// Analysis modes take `source` (required) plus the optional settings
/// `dialect`, `context_radius`, `highlight`, `all_occurrences`,
/// `include_details` and `rules`. `rules` mode takes only `rules`.
///
/// # Example
///
/// ```
/// let out = decipher_core::ffi::run_json("obfuscation", r#"{"source": "eval(x)"}"#);
/// let v: serde_json::Value = serde_json::from_str(&out).unwrap();
/// assert_eq!(v["ok"], true);
/// assert_eq!(v["data"]["obfuscation"][1]["title"], "Eval Function Obfuscation");
/// ```
pub fn run_json(mode: &str, args_json: &str) -> String {
    match run_json_inner(mode, args_json) {
        Ok(data) => ResponseEnvelope::success(data).to_json(),
        Err(err) => ResponseEnvelope::error(&err).to_json(),
    }
}

fn run_json_inner(mode: &str, args_json: &str) -> Result<Value, DecipherError> {
    let args: Value = serde_json::from_str(args_json)?;
    if !args.is_object() {
        return Err(DecipherError::invalid_json("arguments must be a JSON object"));
    }

    match mode {
        "structure" | "obfuscation" | "both" => {
            let analysis_mode = AnalysisMode::parse(mode).ok_or_else(|| DecipherError::unknown_mode(mode))?;
            let source = parse_required_string(&args, "source")?;
            let settings = parse_settings(&args, analysis_mode)?;
            let explanation = explain(&source, &settings)?;
            Ok(serde_json::to_value(&explanation)?)
        }
        "rules" => {
            let settings = Settings {
                rules: parse_rules(&args)?,
                ..Settings::default()
            };
            Ok(serde_json::to_value(rules(&settings)?)?)
        }
        "version" => Ok(serde_json::json!({
            "version": version(),
            "schema_version": schema_version(),
        })),
        _ => Err(DecipherError::unknown_mode(mode)),
    }
}

// ============================================================================
// Strict parsing helpers
// ============================================================================

/// Parse a boolean field strictly: missing/null -> default, non-bool -> error.
fn parse_bool(args: &Value, field: &str, default: bool) -> Result<bool, DecipherError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| DecipherError::invalid_field(field, "a boolean (true or false)")),
    }
}

/// Parse a usize field strictly: missing/null -> default, non-number -> error.
fn parse_usize(args: &Value, field: &str, default: usize) -> Result<usize, DecipherError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| DecipherError::invalid_field(field, "a non-negative integer")),
    }
}

fn parse_required_string(args: &Value, field: &str) -> Result<String, DecipherError> {
    match args.get(field) {
        None | Some(Value::Null) => Err(DecipherError::missing_field(field)),
        Some(v) => v
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DecipherError::invalid_field(field, "a string")),
    }
}

fn parse_dialect(args: &Value) -> Result<Dialect, DecipherError> {
    match args.get("dialect") {
        None | Some(Value::Null) => Ok(Dialect::default()),
        Some(v) => v.as_str().and_then(Dialect::parse).ok_or_else(|| {
            DecipherError::invalid_field("dialect", "'javascript', 'typescript', or 'tsx'")
        }),
    }
}

fn parse_highlight(args: &Value) -> Result<HighlightStyle, DecipherError> {
    match args.get("highlight") {
        None | Some(Value::Null) => Ok(HighlightStyle::default()),
        Some(v) => serde_json::from_value::<HighlightStyle>(v.clone())
            .map_err(|_| DecipherError::invalid_field("highlight", "'bold' or 'html'")),
    }
}

fn parse_rules(args: &Value) -> Result<Vec<CustomRule>, DecipherError> {
    match args.get("rules") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => serde_json::from_value::<Vec<CustomRule>>(v.clone()).map_err(|_| {
            DecipherError::invalid_field(
                "rules",
                "an array of {name, pattern, explanation, example} objects",
            )
        }),
    }
}

fn parse_settings(args: &Value, mode: AnalysisMode) -> Result<Settings, DecipherError> {
    let defaults = Settings::default();
    Ok(Settings {
        mode,
        dialect: parse_dialect(args)?,
        context_radius: parse_usize(args, "context_radius", defaults.context_radius)?,
        highlight: parse_highlight(args)?,
        all_occurrences: parse_bool(args, "all_occurrences", defaults.all_occurrences)?,
        include_details: parse_bool(args, "include_details", defaults.include_details)?,
        rules: parse_rules(args)?,
    })
}

/// Get the decipher version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get the schema version.
pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}
