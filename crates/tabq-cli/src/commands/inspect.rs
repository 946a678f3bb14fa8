//! Snapshot inspection commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabq_rl::{QLearningAgent, Snapshot};
use tracing::warn;

use crate::config::Config;
use crate::corridor::{Corridor, Move, LENGTH_LABEL};

#[derive(Args)]
pub struct InspectArgs {
    /// Snapshot file written by `tabq train --output`
    snapshot: PathBuf,

    /// Corridor length to evaluate on (defaults to the length stored in the
    /// snapshot, then to config)
    #[arg(short, long)]
    length: Option<usize>,

    /// Print the policy as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct PolicyRow {
    state: usize,
    value: f64,
    best_action: Option<Move>,
}

pub fn run(args: InspectArgs, config: &Config) -> Result<()> {
    let snapshot: Snapshot<usize, Move> = Snapshot::load(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let saved_at = snapshot.saved_at;
    let params = snapshot.hyperparameters;

    let corridor = Corridor::new(corridor_length(
        &snapshot,
        args.length,
        config.training.corridor_length,
    ));
    let stray = states_at_or_beyond_goal(&snapshot, corridor);
    if stray > 0 {
        warn!(
            "{} stored states lie at or past the goal of a corridor of length {}; \
             the snapshot was probably trained on a longer corridor",
            stray,
            corridor.length()
        );
    }
    let rows = policy_rows(QLearningAgent::from_snapshot(snapshot, corridor));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Snapshot saved at {saved_at}");
    println!(
        "alpha = {}, epsilon = {}, discount = {}\n",
        params.alpha, params.epsilon, params.discount
    );
    println!("{:<8} {:>10} {:<8}", "STATE", "V(s)", "BEST");
    println!("{}", "-".repeat(28));
    for row in rows {
        let best = row
            .best_action
            .map_or_else(|| "-".to_string(), |action| action.to_string());
        println!("{:<8} {:>10.3} {:<8}", row.state, row.value, best);
    }

    Ok(())
}

/// Length recorded at training time wins unless explicitly overridden
fn corridor_length(
    snapshot: &Snapshot<usize, Move>,
    requested: Option<usize>,
    configured: usize,
) -> usize {
    let stored = snapshot
        .label(LENGTH_LABEL)
        .and_then(serde_json::Value::as_u64)
        .and_then(|length| usize::try_from(length).ok());

    match (stored, requested) {
        (Some(stored), Some(requested)) => {
            if stored != requested {
                warn!(
                    "Snapshot was trained on a corridor of length {}, inspecting with length {}",
                    stored, requested
                );
            }
            requested
        }
        (Some(stored), None) => stored,
        (None, requested) => requested.unwrap_or(configured),
    }
}

/// Learned states that would be terminal (or outside) in `corridor`.
///
/// Updates only ever write non-terminal states, so any hit means the
/// corridor is shorter than the one the table was trained on.
fn states_at_or_beyond_goal(snapshot: &Snapshot<usize, Move>, corridor: Corridor) -> usize {
    let mut states: Vec<usize> = snapshot
        .table
        .iter()
        .map(|(state, _, _)| *state)
        .filter(|state| corridor.is_terminal(*state))
        .collect();
    states.sort_unstable();
    states.dedup();
    states.len()
}

fn policy_rows(agent: QLearningAgent<usize, Move, Corridor>) -> Vec<PolicyRow> {
    let states = agent.action_source().states();
    agent
        .greedy_policy(&states)
        .into_iter()
        .map(|(state, best_action)| PolicyRow {
            state,
            value: agent.value(&state),
            best_action,
        })
        .collect()
}
