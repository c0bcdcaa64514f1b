//! Structured error types for binding-friendly API.
//!
//! These error types are designed to be easily converted to JSON
//! for FFI boundaries while providing rich error information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use decipher_obfuscation::RuleError;
use decipher_parse::ParseError;

/// Error codes for decipher operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Source text is not valid under the selected grammar.
    ParseFailure,
    /// Invalid JSON input.
    InvalidJson,
    /// Unknown operation mode.
    UnknownMode,
    /// Invalid settings/arguments.
    InvalidSettings,
    /// A custom obfuscation rule could not be built.
    InvalidRule,
    /// Internal error (unexpected state).
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::ParseFailure => write!(f, "parse_failure"),
            ErrorCode::InvalidJson => write!(f, "invalid_json"),
            ErrorCode::UnknownMode => write!(f, "unknown_mode"),
            ErrorCode::InvalidSettings => write!(f, "invalid_settings"),
            ErrorCode::InvalidRule => write!(f, "invalid_rule"),
            ErrorCode::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error for FFI-friendly error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecipherError {
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DecipherError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an error with additional details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Create an invalid JSON error.
    pub fn invalid_json(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidJson, format!("Invalid JSON: {}", err))
    }

    /// Create an unknown mode error.
    pub fn unknown_mode(mode: &str) -> Self {
        Self::new(ErrorCode::UnknownMode, format!("Unknown mode: {}", mode))
    }

    /// Create an error for a settings field holding the wrong kind of value.
    pub fn invalid_field(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidSettings,
            format!("Invalid value for '{}': expected {}", field, expected),
        )
    }

    /// Create an error for a required settings field that is absent.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::InvalidSettings,
            format!("Missing required field: {}", field),
        )
    }

    /// Create an internal error.
    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {}", err))
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","message":"{}"}}"#,
                self.code, self.message
            )
        })
    }
}

impl fmt::Display for DecipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "[{}] {}: {}", self.code, self.message, details)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for DecipherError {}

/// The parser message is kept verbatim; the location goes to `details`.
impl From<ParseError> for DecipherError {
    fn from(err: ParseError) -> Self {
        match (err.line, err.column) {
            (Some(line), Some(column)) => Self::with_details(
                ErrorCode::ParseFailure,
                err.message,
                format!("line {}, column {}", line, column),
            ),
            _ => Self::new(ErrorCode::ParseFailure, err.message),
        }
    }
}

impl From<RuleError> for DecipherError {
    fn from(err: RuleError) -> Self {
        Self::new(ErrorCode::InvalidRule, err.to_string())
    }
}

impl From<serde_json::Error> for DecipherError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_json(err)
    }
}

/// `{"ok": true, "data": …}` or `{"ok": false, "error": {…}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DecipherError>,
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(err: &DecipherError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(err.clone()),
        }
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            let err = self
                .error
                .clone()
                .unwrap_or_else(|| DecipherError::internal("response could not be serialized"));
            format!(r#"{{"ok":false,"error":{}}}"#, err.to_json())
        })
    }
}
