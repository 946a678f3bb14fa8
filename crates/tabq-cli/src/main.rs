//! tabq CLI - trains and inspects tabular Q-learning agents
//!
//! The CLI is a small training driver around `tabq-rl`: it runs an agent on
//! a corridor environment, reports statistics and saves or inspects
//! snapshots of the learned table.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod corridor;

use commands::{inspect, train};

#[derive(Parser)]
#[command(name = "tabq")]
#[command(author, version, about = "tabq - tabular Q-learning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "TABQ_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent on the corridor environment
    Train(train::TrainArgs),

    /// Show the greedy policy stored in a snapshot
    Inspect(inspect::InspectArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tabq_cli={log_level},tabq_rl={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Train(args) => train::run(args, config),
        Commands::Inspect(args) => inspect::run(args, &config),
        Commands::Config(cmd) => commands::config::run(cmd, &config),
    }
}
