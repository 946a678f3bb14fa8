//! Saving and restoring learned values
//!
//! A [`Snapshot`] captures the value table and hyperparameters of an agent.
//! It is stored as pretty-printed JSON. The action source and the
//! exploration generator are not part of a snapshot; they are supplied again
//! on restore. Callers that need to rebuild the action source can record
//! what it was built from as labels.

use std::collections::BTreeMap;
use std::fs;
use std::hash::Hash;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::{Hyperparameters, QLearningAgent};
use crate::error::Result;
use crate::state::ActionSource;
use crate::table::ValueTable;

/// Point-in-time copy of an agent's learned state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Eq + Hash + Serialize, A: Eq + Hash + Serialize",
    deserialize = "S: Eq + Hash + Deserialize<'de>, A: Eq + Hash + Deserialize<'de>"
))]
pub struct Snapshot<S, A> {
    pub hyperparameters: Hyperparameters,
    pub saved_at: DateTime<Utc>,
    pub table: ValueTable<S, A>,
    /// Free-form description of the environment the table was learned in
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, serde_json::Value>,
}

impl<S, A> Snapshot<S, A> {
    /// Attach a label, replacing any previous value under `key`
    pub fn with_label(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn label(&self, key: &str) -> Option<&serde_json::Value> {
        self.labels.get(key)
    }
}

impl<S, A> Snapshot<S, A>
where
    S: Eq + Hash + Serialize + DeserializeOwned,
    A: Eq + Hash + Serialize + DeserializeOwned,
{
    /// Write the snapshot to `path` as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(
            "Saved snapshot with {} entries to {}",
            self.table.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a snapshot previously written by [`save`](Self::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&contents)?;
        debug!(
            "Loaded snapshot with {} entries from {}",
            snapshot.table.len(),
            path.display()
        );
        Ok(snapshot)
    }
}

impl<S, A, L> QLearningAgent<S, A, L>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
    L: ActionSource<S, A>,
{
    /// Copy the current table and hyperparameters
    pub fn snapshot(&self) -> Snapshot<S, A> {
        Snapshot {
            hyperparameters: self.hyperparameters(),
            saved_at: Utc::now(),
            table: self.table().clone(),
            labels: BTreeMap::new(),
        }
    }

    /// Rebuild an agent from a snapshot and a fresh action source
    pub fn from_snapshot(snapshot: Snapshot<S, A>, actions: L) -> Self {
        Self::from_parts(snapshot.table, snapshot.hyperparameters, actions)
    }
}
