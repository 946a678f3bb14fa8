//! Q-learning agent

use std::fmt;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::AgentConfig;
use crate::experience::Experience;
use crate::state::{ActionSource, Reward};
use crate::table::ValueTable;

/// Fixed learning parameters of an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α
    pub alpha: f64,
    /// Exploration probability ε
    pub epsilon: f64,
    /// Discount factor γ
    pub discount: f64,
}

/// Tabular Q-learning agent with epsilon-greedy exploration.
///
/// The agent keeps no episode or step bookkeeping; the value table is its
/// only mutable state apart from the exploration generator. Legal actions
/// are asked of the [`ActionSource`] on every call that needs them.
pub struct QLearningAgent<S, A, L> {
    table: ValueTable<S, A>,
    params: Hyperparameters,
    actions: L,
    rng: StdRng,
}

impl<S, A, L> QLearningAgent<S, A, L>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
    L: ActionSource<S, A>,
{
    /// Create a new agent
    ///
    /// # Arguments
    ///
    /// * `alpha` - learning rate
    /// * `epsilon` - probability of taking a uniformly random legal action
    /// * `discount` - weight of the bootstrapped next-state value
    /// * `actions` - source of legal actions per state
    pub fn new(alpha: f64, epsilon: f64, discount: f64, actions: L) -> Self {
        Self::with_hyperparameters(
            Hyperparameters {
                alpha,
                epsilon,
                discount,
            },
            actions,
        )
    }

    pub fn with_hyperparameters(params: Hyperparameters, actions: L) -> Self {
        Self::from_parts(ValueTable::new(), params, actions)
    }

    /// Create an agent from config, seeding the generator if a seed is set
    pub fn from_config(config: &AgentConfig, actions: L) -> Self {
        let agent = Self::with_hyperparameters(config.hyperparameters(), actions);
        match config.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        }
    }

    pub(crate) fn from_parts(table: ValueTable<S, A>, params: Hyperparameters, actions: L) -> Self {
        debug!(
            "Q-learning agent created: alpha={}, epsilon={}, discount={}, entries={}",
            params.alpha,
            params.epsilon,
            params.discount,
            table.len()
        );
        Self {
            table,
            params,
            actions,
            rng: StdRng::from_entropy(),
        }
    }

    /// Make exploration reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Q(state, action), 0.0 if never set
    pub fn q_value(&self, state: &S, action: &A) -> f64 {
        self.table.get(state, action)
    }

    /// Overwrite Q(state, action)
    pub fn set_q_value(&mut self, state: S, action: A, value: f64) {
        self.table.set(state, action, value);
    }

    /// V(state): the best Q-value over legal actions.
    ///
    /// States without legal actions are terminal and have value 0.0.
    pub fn value(&self, state: &S) -> f64 {
        self.actions
            .legal_actions(state)
            .iter()
            .map(|action| self.table.get(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Apply one Q-learning step for the transition (s, a, r, s'):
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·V(s'))
    pub fn update(&mut self, state: &S, action: &A, reward: Reward, next_state: &S) {
        let Hyperparameters {
            alpha, discount, ..
        } = self.params;

        // Both reads happen before the write, so self-loops see the old value.
        let current_q = self.q_value(state, action);
        let next_value = self.value(next_state);
        let new_q = (1.0 - alpha) * current_q + alpha * (reward + discount * next_value);

        trace!(
            "Q-update: reward={}, V(s')={:.4}, Q {:.4} -> {:.4}",
            reward,
            next_value,
            current_q,
            new_q
        );

        self.set_q_value(state.clone(), action.clone(), new_q);
    }

    /// Apply [`update`](Self::update) to a recorded transition
    pub fn learn(&mut self, experience: &Experience<S, A>) {
        self.update(
            &experience.state,
            &experience.action,
            experience.reward,
            &experience.next_state,
        );
    }

    /// Legal action with the highest Q-value, `None` for terminal states.
    ///
    /// Ties go to the action the source lists first.
    pub fn best_action(&self, state: &S) -> Option<A> {
        let legal = self.actions.legal_actions(state);
        self.greedy_among(state, legal)
    }

    /// Epsilon-greedy action selection.
    ///
    /// With probability ε returns a uniformly random legal action, otherwise
    /// the [`best_action`](Self::best_action). `None` for terminal states.
    pub fn action(&mut self, state: &S) -> Option<A> {
        let legal = self.actions.legal_actions(state);
        if legal.is_empty() {
            return None;
        }

        if self.rng.gen::<f64>() < self.params.epsilon {
            legal.choose(&mut self.rng).cloned()
        } else {
            self.greedy_among(state, legal)
        }
    }

    // NaN loses to any number, matching the f64::max fold in `value`.
    fn greedy_among(&self, state: &S, legal: Vec<A>) -> Option<A> {
        let mut best: Option<(A, f64)> = None;
        for action in legal {
            let q = self.table.get(state, &action);
            let better = best
                .as_ref()
                .map_or(true, |(_, best_q)| q > *best_q || (best_q.is_nan() && !q.is_nan()));
            if better {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Best action for each of the given states
    pub fn greedy_policy(&self, states: &[S]) -> Vec<(S, Option<A>)> {
        states
            .iter()
            .map(|state| (state.clone(), self.best_action(state)))
            .collect()
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.params
    }

    /// Read access to the learned values
    pub fn table(&self) -> &ValueTable<S, A> {
        &self.table
    }

    pub fn action_source(&self) -> &L {
        &self.actions
    }
}

impl<S, A, L> fmt::Debug for QLearningAgent<S, A, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QLearningAgent")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
