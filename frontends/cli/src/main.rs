use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use scorecard_cli::cli::{Cli, Command};
use scorecard_cli::config::CliConfig;
use scorecard_cli::{commands, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = CliConfig::load(&cli.config)?;
    run(&cli.command, &config).await
}

async fn run(command: &Command, config: &CliConfig) -> Result<()> {
    match command {
        Command::Submit(args) => commands::submit(config, args).await,
        Command::Flush => commands::flush(config).await,
        Command::Pending { json } => commands::pending(config, *json).await,
        Command::Watch { interval } => {
            commands::watch(config, Duration::from_secs((*interval).max(1))).await
        }
        Command::Criteria => {
            commands::criteria();
            Ok(())
        }
    }
}
