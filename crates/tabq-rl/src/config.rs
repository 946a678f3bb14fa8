//! Agent configuration

use serde::{Deserialize, Serialize};

use crate::agent::Hyperparameters;

/// Agent configuration as read from a config file or environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate, expected in (0, 1]
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Exploration probability, expected in [0, 1]
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Per-step discount, expected in [0, 1)
    #[serde(default = "default_discount")]
    pub discount: f64,

    /// Fixed seed for the exploration generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_alpha() -> f64 {
    0.5
}
fn default_epsilon() -> f64 {
    0.1
}
fn default_discount() -> f64 {
    0.99
}

impl AgentConfig {
    /// Hyperparameters described by this config.
    ///
    /// Values are passed through as-is; out-of-range numbers are not rejected.
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            alpha: self.alpha,
            epsilon: self.epsilon,
            discount: self.discount,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            epsilon: default_epsilon(),
            discount: default_discount(),
            seed: None,
        }
    }
}
