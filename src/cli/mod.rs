use clap::{Parser, Subcommand};
use std::path::PathBuf;

use deckhand::config::Environment;

pub mod backups;
pub mod deploy;
pub mod health;
pub mod init;

#[derive(Parser)]
#[command(
    name = "deckhand",
    version,
    about = "Deploy a Docker Compose stack with backup, health checks, and rollback"
)]
pub struct Cli {
    /// Path to deckhand.toml
    #[arg(short, long, default_value = "deckhand.toml")]
    pub config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scaffold deckhand.toml in the current directory
    Init,

    /// Run the full deployment pipeline
    Deploy {
        /// Target environment
        #[arg(value_enum, default_value_t = Environment::Staging)]
        environment: Environment,
    },

    /// Probe the configured health endpoints without deploying
    Health {
        /// Target environment
        #[arg(value_enum, default_value_t = Environment::Staging)]
        environment: Environment,
    },

    /// Inspect and prune pre-deploy backups
    Backups {
        #[command(subcommand)]
        action: BackupsAction,
    },
}

#[derive(Subcommand)]
pub enum BackupsAction {
    /// List backups, newest first
    List,
    /// Remove backups beyond the retention count
    Prune {
        /// Backups to keep (defaults to deploy.keep_backups)
        #[arg(long)]
        retain: Option<usize>,
    },
}
