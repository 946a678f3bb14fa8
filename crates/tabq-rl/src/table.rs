//! Sparse Q-value table

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value reported for any (state, action) pair that was never written
pub const DEFAULT_Q_VALUE: f64 = 0.0;

/// Q-values indexed by state, then action.
///
/// Reads of unknown pairs yield [`DEFAULT_Q_VALUE`] without touching the
/// map, so probing the table never grows it. Entries are only ever added or
/// overwritten.
#[derive(Debug, Clone)]
pub struct ValueTable<S, A> {
    values: HashMap<S, HashMap<A, f64>>,
}

impl<S, A> ValueTable<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &S, action: &A) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(DEFAULT_Q_VALUE)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Whether the pair has been written at least once
    pub fn contains(&self, state: &S, action: &A) -> bool {
        self.values
            .get(state)
            .is_some_and(|row| row.contains_key(action))
    }

    /// Stored (action, value) pairs for one state
    pub fn actions<'a>(&'a self, state: &S) -> impl Iterator<Item = (&'a A, f64)> + 'a {
        self.values
            .get(state)
            .into_iter()
            .flat_map(|row| row.iter().map(|(action, value)| (action, *value)))
    }

    /// All stored (state, action, value) triples, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&S, &A, f64)> + '_ {
        self.values.iter().flat_map(|(state, row)| {
            row.iter()
                .map(move |(action, value)| (state, action, *value))
        })
    }

    /// Total number of stored pairs
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    /// Number of states with at least one stored pair
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S, A> Default for ValueTable<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

// JSON objects can only be keyed by strings, so the table goes over the wire
// as a flat list of entries.

#[derive(Serialize)]
struct EntryRef<'a, S, A> {
    state: &'a S,
    action: &'a A,
    value: f64,
}

#[derive(Deserialize)]
struct Entry<S, A> {
    state: S,
    action: A,
    value: f64,
}

impl<S, A> Serialize for ValueTable<S, A>
where
    S: Eq + Hash + Serialize,
    A: Eq + Hash + Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(
            self.iter()
                .map(|(state, action, value)| EntryRef { state, action, value }),
        )
    }
}

impl<'de, S, A> Deserialize<'de> for ValueTable<S, A>
where
    S: Eq + Hash + Deserialize<'de>,
    A: Eq + Hash + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Entry<S, A>>::deserialize(deserializer)?;
        let mut table = Self::new();
        for entry in entries {
            table.set(entry.state, entry.action, entry.value);
        }
        Ok(table)
    }
}
