use anyhow::Result;
use clap::CommandFactory;
use decipher_config as cli;

pub(crate) fn handle(args: cli::CompletionsArgs) -> Result<()> {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
