//! Integration tests for the Q-learning agent
//!
//! These tests drive the agent through the public API the way a training
//! loop would.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tabq_rl::{ActionSource, Experience, ExperienceBuffer, NoActions, QLearningAgent};

/// Action source backed by a fixed map; counts how often it is consulted
struct MapSource {
    legal: HashMap<&'static str, Vec<&'static str>>,
    calls: Cell<usize>,
}

impl MapSource {
    fn new(entries: &[(&'static str, &[&'static str])]) -> Self {
        Self {
            legal: entries
                .iter()
                .map(|(state, actions)| (*state, actions.to_vec()))
                .collect(),
            calls: Cell::new(0),
        }
    }
}

impl ActionSource<&'static str, &'static str> for MapSource {
    fn legal_actions(&self, state: &&'static str) -> Vec<&'static str> {
        self.calls.set(self.calls.get() + 1);
        self.legal.get(state).cloned().unwrap_or_default()
    }
}

fn create_test_agent(epsilon: f64) -> QLearningAgent<&'static str, &'static str, MapSource> {
    let source = MapSource::new(&[
        ("s", &["a1", "a2"][..]),
        ("s2", &["b"][..]),
        ("tri", &["a1", "a2", "a3"][..]),
        ("quad", &["n", "e", "s", "w"][..]),
    ]);
    QLearningAgent::new(0.5, epsilon, 0.9, source).with_seed(7)
}

#[test]
fn test_terminal_state_fallbacks() {
    let mut agent = create_test_agent(0.5);

    assert_eq!(agent.value(&"terminal"), 0.0);
    assert_eq!(agent.best_action(&"terminal"), None);
    assert_eq!(agent.action(&"terminal"), None);
}

#[test]
fn test_unset_pairs_read_zero_without_growth() {
    let agent = create_test_agent(0.0);

    for state in ["s", "s2", "tri", "unknown"] {
        for action in ["a1", "b", "zzz"] {
            assert_eq!(agent.q_value(&state, &action), 0.0);
        }
        let _ = agent.value(&state);
        let _ = agent.best_action(&state);
    }

    assert!(agent.table().is_empty());
}

#[test]
fn test_queries_are_idempotent() {
    let mut agent = create_test_agent(0.0);
    agent.set_q_value("tri", "a1", 1.0);
    agent.set_q_value("tri", "a3", 2.0);

    let first = (
        agent.value(&"tri"),
        agent.q_value(&"tri", &"a3"),
        agent.best_action(&"tri"),
    );
    for _ in 0..10 {
        let again = (
            agent.value(&"tri"),
            agent.q_value(&"tri", &"a3"),
            agent.best_action(&"tri"),
        );
        assert_eq!(again, first);
    }
}

#[test]
fn test_update_then_chained_bootstrap() {
    let mut agent = create_test_agent(0.0);
    agent.update(&"s", &"a1", 10.0, &"s2");
    assert_eq!(agent.q_value(&"s", &"a1"), 5.0);

    let mut agent = create_test_agent(0.0);
    agent.set_q_value("s2", "b", 20.0);
    agent.update(&"s", &"a1", 10.0, &"s2");
    assert!((agent.q_value(&"s", &"a1") - 14.0).abs() < 1e-12);
}

#[test]
fn test_terminal_transition_ignores_stored_values() {
    let mut agent = create_test_agent(0.0);
    agent.set_q_value("terminal", "x", 500.0);
    agent.set_q_value("terminal", "y", -500.0);

    agent.update(&"s", &"a2", 4.0, &"terminal");
    assert_eq!(agent.q_value(&"s", &"a2"), 2.0);
}

#[test]
fn test_negative_rewards_are_not_clamped() {
    let mut agent = create_test_agent(0.0);
    agent.set_q_value("s", "a1", -2.0);
    agent.set_q_value("s2", "b", -10.0);

    agent.update(&"s", &"a1", -5.0, &"s2");
    // 0.5 * -2 + 0.5 * (-5 + 0.9 * -10) = -1 - 7
    assert!((agent.q_value(&"s", &"a1") - (-8.0)).abs() < 1e-12);
    // a2 is still unset, so it wins the max
    assert_eq!(agent.value(&"s"), 0.0);
}

#[test]
fn test_best_action_strict_maximum_with_ties() {
    let mut agent = create_test_agent(0.0);
    agent.set_q_value("tri", "a1", 3.0);
    agent.set_q_value("tri", "a2", 7.0);
    agent.set_q_value("tri", "a3", 7.0);

    for _ in 0..20 {
        assert_eq!(agent.best_action(&"tri"), Some("a2"));
    }
    assert_eq!(agent.value(&"tri"), 7.0);
}

#[test]
fn test_action_source_consulted_once_per_operation() {
    let mut agent = create_test_agent(0.5);

    let before = agent_calls(&agent);
    let _ = agent.value(&"s");
    assert_eq!(agent_calls(&agent), before + 1);

    let before = agent_calls(&agent);
    let _ = agent.best_action(&"s");
    assert_eq!(agent_calls(&agent), before + 1);

    let before = agent_calls(&agent);
    let _ = agent.action(&"s");
    assert_eq!(agent_calls(&agent), before + 1);

    let before = agent_calls(&agent);
    agent.update(&"s", &"a1", 1.0, &"s2");
    assert_eq!(agent_calls(&agent), before + 1);

    let before = agent_calls(&agent);
    let _ = agent.q_value(&"s", &"a1");
    agent.set_q_value("s", "a2", 1.0);
    assert_eq!(agent_calls(&agent), before);
}

fn agent_calls(agent: &QLearningAgent<&'static str, &'static str, MapSource>) -> usize {
    agent.action_source().calls.get()
}

/// epsilon = 0.3 with two actions: the non-greedy action comes up in about
/// 0.3 * 1/2 of the calls.
#[test]
fn test_exploration_frequency_two_actions() {
    let mut agent = create_test_agent(0.3);
    agent.set_q_value("s", "a1", 1.0);
    agent.set_q_value("s", "a2", -1.0);

    let trials = 10_000;
    let non_greedy = (0..trials)
        .filter(|_| agent.action(&"s") == Some("a2"))
        .count();

    let frequency = non_greedy as f64 / f64::from(trials);
    assert!(
        (frequency - 0.15).abs() < 0.02,
        "non-greedy frequency {frequency} should be close to 0.15"
    );
}

#[test]
fn test_exploration_frequency_four_actions() {
    let mut agent = create_test_agent(0.5);
    agent.set_q_value("quad", "e", 3.0);

    let trials = 20_000;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for _ in 0..trials {
        let action = agent.action(&"quad").unwrap();
        *counts.entry(action).or_default() += 1;
    }

    // greedy: 0.5 + 0.5 / 4, each other action: 0.5 / 4
    let greedy = counts["e"] as f64 / f64::from(trials);
    assert!((greedy - 0.625).abs() < 0.02, "greedy frequency {greedy}");
    for action in ["n", "s", "w"] {
        let frequency = counts[action] as f64 / f64::from(trials);
        assert!(
            (frequency - 0.125).abs() < 0.02,
            "{action} frequency {frequency}"
        );
    }
}

#[test]
fn test_full_exploration_is_uniform() {
    let mut agent = create_test_agent(1.0);
    agent.set_q_value("s", "a1", 100.0);

    let trials = 10_000;
    let picked_a2 = (0..trials)
        .filter(|_| agent.action(&"s") == Some("a2"))
        .count();

    let frequency = picked_a2 as f64 / f64::from(trials);
    assert!((frequency - 0.5).abs() < 0.03, "frequency {frequency}");
}

#[test]
fn test_agents_have_independent_tables() {
    let mut first = create_test_agent(0.0);
    let second = create_test_agent(0.0);

    first.update(&"s", &"a1", 10.0, &"s2");
    assert_eq!(first.q_value(&"s", &"a1"), 5.0);
    assert_eq!(second.q_value(&"s", &"a1"), 0.0);
}

#[test]
fn test_empty_action_source() {
    let mut agent: QLearningAgent<String, String, NoActions> =
        QLearningAgent::new(0.5, 1.0, 0.9, NoActions);

    let state = "anything".to_string();
    assert_eq!(agent.value(&state), 0.0);
    assert_eq!(agent.best_action(&state), None);
    assert_eq!(agent.action(&state), None);
}

/// Chain 0 -> 1 -> ... -> 4 with "right" moving forward and "stay" looping.
/// Reaching 4 pays 1.0 and ends the episode.
fn chain_actions(state: &u8) -> Vec<&'static str> {
    if *state >= 4 {
        vec![]
    } else {
        vec!["stay", "right"]
    }
}

fn chain_step(state: u8, action: &str) -> (f64, u8) {
    match action {
        "right" if state + 1 == 4 => (1.0, 4),
        "right" => (0.0, state + 1),
        _ => (0.0, state),
    }
}

#[test]
fn test_training_loop_learns_chain() {
    let mut agent = QLearningAgent::new(0.5, 0.2, 0.9, chain_actions).with_seed(3);

    for _episode in 0..300 {
        let mut state = 0_u8;
        for _step in 0..50 {
            let Some(action) = agent.action(&state) else {
                break;
            };
            let (reward, next_state) = chain_step(state, action);
            agent.update(&state, &action, reward, &next_state);
            state = next_state;
        }
    }

    for state in 0..4_u8 {
        assert_eq!(agent.best_action(&state), Some("right"), "state {state}");
    }
    // V(3) -> 1.0, V(2) -> 0.9, ...
    assert!((agent.value(&3) - 1.0).abs() < 0.05);
    assert!(agent.value(&2) > agent.value(&0));
    assert_eq!(agent.value(&4), 0.0);
}

#[test]
fn test_replay_through_learn() {
    let mut agent = QLearningAgent::new(0.5, 0.0, 0.9, chain_actions);
    let mut buffer = ExperienceBuffer::new(16);

    buffer.push(Experience::new(3_u8, "right", 1.0, 4_u8));
    buffer.push(Experience::new(2_u8, "right", 0.0, 3_u8));

    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..20 {
        for experience in buffer.sample(2, &mut rng) {
            agent.learn(&experience);
        }
    }

    assert!((agent.q_value(&3, &"right") - 1.0).abs() < 1e-3);
    assert!((agent.q_value(&2, &"right") - 0.9).abs() < 1e-2);
}
