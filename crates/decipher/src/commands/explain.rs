use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use decipher_config as cli;

use crate::config::{ResolvedConfig, resolve_settings};
use crate::output;

pub(crate) fn handle(args: cli::ExplainArgs, resolved: &ResolvedConfig) -> Result<()> {
    let (settings, format) = resolve_settings(&args, &resolved.toml);
    let source = read_source(args.file.as_deref())?;
    debug!(bytes = source.len(), mode = %settings.mode, "explaining input");

    let explanation = decipher_core::explain(&source, &settings)
        .with_context(|| format!("Failed to explain {}", display_name(args.file.as_deref())))?;

    if let Some(err) = &explanation.parse_error {
        warn!("structure explanation skipped: {}", err);
    }

    println!("{}", output::render(&explanation, format)?);
    Ok(())
}

/// FILE, or stdin when FILE is absent or `-`.
fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read source from stdin")?;
            Ok(buf)
        }
    }
}

fn display_name(file: Option<&Path>) -> String {
    match file {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "<stdin>".to_string(),
    }
}
