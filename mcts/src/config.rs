//! MCTS configuration parameters.

/// Configuration for Monte Carlo Tree Search.
///
/// Passed to [`MctsAgent::new`](crate::MctsAgent::new), so independently
/// configured agents (e.g. difficulty levels) can coexist.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of search iterations per move decision. Each iteration runs
    /// one selection/expansion/rollout/backpropagation pass.
    pub iterations: u32,

    /// Exploration weight for the UCB1 formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_constant: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 800,
            exploration_constant: 1.41,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 100,
            exploration_constant: 1.41,
        }
    }

    /// Builder pattern: set the number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the UCB1 exploration weight.
    pub fn with_exploration_constant(mut self, c: f32) -> Self {
        self.exploration_constant = c;
        self
    }
}
