//! # decipher
//!
//! **CLI Binary**
//!
//! This is the entry point for the `decipher` command-line application.
//! It orchestrates the other crates to perform the requested actions.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Load configuration
//! * Dispatch commands to appropriate handlers
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod commands;
mod config;
mod error_hints;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use decipher_config::Cli;
use decipher_core::{DecipherError, ErrorCode};

pub use config::{ResolvedConfig, resolve_settings};

/// Exit status when the source does not parse in structure mode.
pub const EXIT_PARSE_FAILURE: i32 = 2;

/// Entry point used by the `decipher` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let resolved = config::load(cli.global.config.as_deref(), &cwd)?;
    commands::dispatch(cli, &resolved)
}

/// Render an error with actionable hints for stderr.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}

/// Process exit status for a failed run.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let parse_failure = err.chain().any(|cause| {
        cause
            .downcast_ref::<DecipherError>()
            .is_some_and(|e| e.code == ErrorCode::ParseFailure)
    });
    if parse_failure { EXIT_PARSE_FAILURE } else { 1 }
}

/// `RUST_LOG` wins; otherwise `-v` is debug and `-vv` trace. Logs go to stderr.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
