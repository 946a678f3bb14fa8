//! tabq RL - Tabular Q-learning
//!
//! This crate provides a Q-learning agent over discrete, hashable states and
//! actions. The agent owns a sparse value table and selects actions with an
//! epsilon-greedy policy. Environments and training loops live outside the
//! crate and talk to the agent through [`ActionSource`] and
//! [`QLearningAgent::update`].

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod agent;
pub mod config;
pub mod error;
pub mod experience;
pub mod snapshot;
pub mod state;
pub mod table;

pub use agent::{Hyperparameters, QLearningAgent};
pub use config::AgentConfig;
pub use error::{Result, TabqError};
pub use experience::{Experience, ExperienceBuffer};
pub use snapshot::Snapshot;
pub use state::{ActionSource, NoActions, Reward};
pub use table::ValueTable;
