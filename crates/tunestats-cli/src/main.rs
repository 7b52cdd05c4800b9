//! Main entry point for tunestats.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tunestats_cli::{render, Cli, CliResult, ReportRunner};
use tunestats_common::init_logging;
use tunestats_config::{Config, ConfigLoader};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("tunestats failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(&cli)?;
    init_logging(&config.logging)?;

    info!("Starting tunestats {}", env!("CARGO_PKG_VERSION"));

    let runner = ReportRunner::from_config(&config)?;
    let response = runner.run(cli.report).await?;
    println!("{}", render(&response, cli.format)?);

    Ok(())
}

fn load_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_config(path)?,
        None => ConfigLoader::load()?,
    };

    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}
