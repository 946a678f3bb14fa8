//! Configuration management commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write the default configuration to a file
    Init {
        /// Output file path
        #[arg(default_value = "tabq.toml")]
        path: String,

        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config),
        ConfigCommands::Init { path, force } => init(&path, force),
    }
}

fn show(config: &Config) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{text}");
    Ok(())
}

fn init(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        println!("Configuration file already exists: {path}");
        println!("Use --force to overwrite");
        return Ok(());
    }

    let text = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {path}"))?;
    println!("Configuration written to {path}");
    Ok(())
}
