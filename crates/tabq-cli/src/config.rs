//! Configuration loading for the tabq CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use tabq_rl::AgentConfig;

/// Configuration for a training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub episodes: usize,
    pub max_steps: usize,
    pub corridor_length: usize,
    /// Experiences replayed after each step; 0 disables replay
    pub replay_batch: usize,
    pub buffer_capacity: usize,
    /// Episodes between progress log lines; 0 silences them
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_steps: 100,
            corridor_length: 8,
            replay_batch: 0,
            buffer_capacity: 1000,
            log_every: 100,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// An explicit path must exist; otherwise the usual locations are
    /// searched and defaults apply when none is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = explicit {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        } else if let Some(path) = Self::find_config_file() {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        // TABQ_AGENT__EPSILON=0.2 -> agent.epsilon
        builder = builder.add_source(
            Environment::with_prefix("TABQ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Find the configuration file: ./tabq.toml, then ~/.config/tabq/tabq.toml
    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from("tabq.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tabq").join("tabq.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }
}
