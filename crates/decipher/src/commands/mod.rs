pub(crate) mod completions;
pub(crate) mod explain;
pub(crate) mod rules;

use anyhow::Result;
use decipher_config as cli;

use crate::config::ResolvedConfig;

pub(crate) fn dispatch(cli: cli::Cli, resolved: &ResolvedConfig) -> Result<()> {
    match cli.command.unwrap_or(cli::Commands::Explain(cli.explain)) {
        cli::Commands::Explain(args) => explain::handle(args, resolved),
        cli::Commands::Rules(args) => rules::handle(args, resolved),
        cli::Commands::Completions(args) => completions::handle(args),
    }
}
