mod cli;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{BackupsAction, Cli, Command};
use deckhand::config::DeckhandConfig;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .without_time()
        .init();

    let project_root = std::env::current_dir()?;

    match cli.command {
        Command::Init => {
            cli::init::run(&project_root)?;
        }

        Command::Deploy { environment } => {
            let config = DeckhandConfig::load(&cli.config)?;
            let outcome = cli::deploy::run(config, environment, project_root).await?;
            return Ok(ExitCode::from(outcome.exit_code()));
        }

        Command::Health { environment } => {
            let config = DeckhandConfig::load(&cli.config)?;
            let healthy = cli::health::run(config, environment).await?;
            if !healthy {
                return Ok(ExitCode::from(1));
            }
        }

        Command::Backups { action } => {
            let config = DeckhandConfig::load(&cli.config)?;
            match action {
                BackupsAction::List => {
                    cli::backups::list(config, &project_root)?;
                }
                BackupsAction::Prune { retain } => {
                    cli::backups::prune(config, &project_root, retain)?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
