//! State, action and reward contracts for the agent

/// Reward value from environment
pub type Reward = f64;

/// Supplies the actions that are legal in a given state.
///
/// The order of the returned vector is the iteration order the agent uses
/// when breaking ties between equally valued actions. An empty vector marks
/// a terminal state.
pub trait ActionSource<S, A> {
    /// Legal actions for `state` (possibly empty)
    fn legal_actions(&self, state: &S) -> Vec<A>;
}

impl<S, A, F> ActionSource<S, A> for F
where
    F: Fn(&S) -> Vec<A>,
{
    fn legal_actions(&self, state: &S) -> Vec<A> {
        self(state)
    }
}

/// Action source with no legal actions anywhere.
///
/// Every state looks terminal to an agent built on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoActions;

impl<S, A> ActionSource<S, A> for NoActions {
    fn legal_actions(&self, _state: &S) -> Vec<A> {
        Vec::new()
    }
}
