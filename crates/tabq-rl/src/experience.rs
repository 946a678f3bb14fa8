//! Experience replay buffer for RL

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::state::Reward;

/// A single sampled transition (s, a, r, s').
///
/// There is no `done` flag: a transition is terminal when the action source
/// offers no actions in `next_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience<S, A> {
    pub state: S,
    pub action: A,
    pub reward: Reward,
    pub next_state: S,
}

impl<S, A> Experience<S, A> {
    /// Create a new experience
    pub fn new(state: S, action: A, reward: Reward, next_state: S) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
        }
    }
}

/// Bounded FIFO of past transitions.
///
/// Once full, pushing drops the oldest experience.
#[derive(Debug, Clone)]
pub struct ExperienceBuffer<S, A> {
    buffer: VecDeque<Experience<S, A>>,
    capacity: usize,
}

impl<S: Clone, A: Clone> ExperienceBuffer<S, A> {
    /// Create a new experience buffer with given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an experience to the buffer
    pub fn push(&mut self, experience: Experience<S, A>) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(experience);
    }

    /// Sample up to `batch_size` distinct experiences uniformly at random.
    ///
    /// Draws only from `rng`, so a seeded generator gives a repeatable batch.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Vec<Experience<S, A>> {
        let experiences: Vec<_> = self.buffer.iter().collect();
        experiences
            .choose_multiple(rng, batch_size.min(experiences.len()))
            .map(|exp| (*exp).clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// All experiences, oldest first
    pub fn all(&self) -> Vec<Experience<S, A>> {
        self.buffer.iter().cloned().collect()
    }
}

impl<S: Clone, A: Clone> Default for ExperienceBuffer<S, A> {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn step(i: u32) -> Experience<u32, char> {
        Experience::new(i, 'r', f64::from(i), i + 1)
    }

    #[test]
    fn test_experience_creation() {
        let exp = Experience::new("s", "a", 1.0, "s2");

        assert_eq!(exp.reward, 1.0);
        assert_eq!(exp.state, "s");
        assert_eq!(exp.next_state, "s2");
    }

    #[test]
    fn test_buffer_push_and_len() {
        let mut buffer = ExperienceBuffer::new(100);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());

        buffer.push(step(0));
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_buffer_capacity_drops_oldest() {
        let mut buffer = ExperienceBuffer::new(3);

        for i in 0..5 {
            buffer.push(step(i));
        }

        assert_eq!(buffer.len(), 3);
        let states: Vec<u32> = buffer.all().iter().map(|e| e.state).collect();
        assert_eq!(states, vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_capacity_buffer_stays_empty() {
        let mut buffer = ExperienceBuffer::new(0);
        buffer.push(step(1));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_sample() {
        let mut buffer = ExperienceBuffer::new(100);
        for i in 0..10 {
            buffer.push(step(i));
        }

        let sample = buffer.sample(5, &mut rand::thread_rng());
        assert_eq!(sample.len(), 5);

        let mut states: Vec<u32> = sample.iter().map(|e| e.state).collect();
        states.sort_unstable();
        states.dedup();
        assert_eq!(states.len(), 5, "samples are drawn without replacement");
    }

    #[test]
    fn test_buffer_sample_larger_than_buffer() {
        let mut buffer = ExperienceBuffer::new(100);
        for i in 0..3 {
            buffer.push(step(i));
        }

        let sample = buffer.sample(10, &mut rand::thread_rng());
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_seeded_sample_is_repeatable() {
        let mut buffer = ExperienceBuffer::new(100);
        for i in 0..50 {
            buffer.push(step(i));
        }

        let first = buffer.sample(8, &mut StdRng::seed_from_u64(17));
        let second = buffer.sample(8, &mut StdRng::seed_from_u64(17));
        assert_eq!(first, second);
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = ExperienceBuffer::new(100);
        buffer.push(step(7));
        assert_eq!(buffer.len(), 1);

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_experience_serialization() {
        let exp = Experience::new(3_u32, "left".to_string(), -1.0, 2_u32);
        let json = serde_json::to_string(&exp).unwrap();
        let parsed: Experience<u32, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, exp);
    }
}
