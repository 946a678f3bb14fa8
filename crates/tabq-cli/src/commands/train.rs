//! Training command: runs the agent against the corridor environment

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tabq_rl::{Experience, ExperienceBuffer, QLearningAgent};
use tracing::{debug, info};

use crate::config::Config;
use crate::corridor::{Corridor, Move, LENGTH_LABEL};

#[derive(Args)]
pub struct TrainArgs {
    /// Number of episodes (overrides config)
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Exploration probability (overrides config)
    #[arg(long)]
    epsilon: Option<f64>,

    /// Seed for reproducible exploration (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Write a snapshot of the learned table to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print statistics as JSON
    #[arg(long)]
    json: bool,
}

/// Summary of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingStats {
    pub episodes: usize,
    pub total_steps: u64,
    pub total_reward: f64,
    pub average_reward: f64,
    pub goals_reached: usize,
    pub table_entries: usize,
}

pub type CorridorAgent = QLearningAgent<usize, Move, Corridor>;

pub fn run(args: TrainArgs, mut config: Config) -> Result<()> {
    if let Some(episodes) = args.episodes {
        config.training.episodes = episodes;
    }
    if let Some(epsilon) = args.epsilon {
        config.agent.epsilon = epsilon;
    }
    if let Some(seed) = args.seed {
        config.agent.seed = Some(seed);
    }

    let (agent, stats) = train(&config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Training Summary");
        println!("================\n");
        println!("Episodes:        {}", stats.episodes);
        println!("Total steps:     {}", stats.total_steps);
        println!("Goals reached:   {}", stats.goals_reached);
        println!("Average reward:  {:.3}", stats.average_reward);
        println!("Table entries:   {}", stats.table_entries);
    }

    if let Some(path) = args.output {
        agent
            .snapshot()
            .with_label(LENGTH_LABEL, agent.action_source().length())
            .save(&path)
            .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}

/// Drive the observe / act / update loop for the configured number of episodes
pub fn train(config: &Config) -> (CorridorAgent, TrainingStats) {
    let training = &config.training;
    let corridor = Corridor::new(training.corridor_length);
    let mut agent = QLearningAgent::from_config(&config.agent, corridor);
    let mut buffer = ExperienceBuffer::new(training.buffer_capacity);
    // Replay batches follow the agent seed so seeded runs repeat exactly.
    let mut replay_rng = match config.agent.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "Training for {} episodes on a corridor of length {}",
        training.episodes,
        corridor.length()
    );

    let mut total_steps = 0_u64;
    let mut total_reward = 0.0;
    let mut goals_reached = 0;

    for episode in 1..=training.episodes {
        let mut state = corridor.start();
        let mut episode_reward = 0.0;

        for _ in 0..training.max_steps {
            let Some(action) = agent.action(&state) else {
                break;
            };
            let (reward, next_state) = corridor.step(state, action);
            agent.update(&state, &action, reward, &next_state);

            if training.replay_batch > 0 {
                buffer.push(Experience::new(state, action, reward, next_state));
                for experience in buffer.sample(training.replay_batch, &mut replay_rng) {
                    agent.learn(&experience);
                }
            }

            episode_reward += reward;
            total_steps += 1;
            state = next_state;
        }

        if corridor.is_terminal(state) {
            goals_reached += 1;
        }
        total_reward += episode_reward;

        debug!("Episode {} finished at {} with reward {:.1}", episode, state, episode_reward);
        if training.log_every > 0 && episode % training.log_every == 0 {
            info!(
                "Episode {}/{}: reward {:.1}, V(start) = {:.3}",
                episode,
                training.episodes,
                episode_reward,
                agent.value(&corridor.start())
            );
        }
    }

    let stats = TrainingStats {
        episodes: training.episodes,
        total_steps,
        total_reward,
        average_reward: if training.episodes > 0 {
            total_reward / training.episodes as f64
        } else {
            0.0
        },
        goals_reached,
        table_entries: agent.table().len(),
    };

    (agent, stats)
}
