//! Monte Carlo Tree Search (MCTS) agent for Connect Four.
//!
//! This crate builds a search tree over positions reachable from a given
//! [`connect4::GameState`] and picks a column for the side to move.
//!
//! # Overview
//!
//! Each search iteration runs four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 (Upper Confidence Bound)
//!    to balance exploration and exploitation
//! 2. **Expansion**: When reaching a node with untried moves, add one
//!    child for a randomly chosen untried move
//! 3. **Simulation**: Play uniformly random moves from the new position
//!    until the game ends
//! 4. **Backpropagation**: Update visit and win counts along the path
//!    from the new node to the root
//!
//! After all iterations the most-visited root child is the chosen move.
//!
//! # Usage
//!
//! ```rust
//! use connect4::GameState;
//! use mcts::{MctsAgent, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let agent = MctsAgent::new(MctsConfig::default().with_iterations(500));
//! let state = GameState::default();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let column = agent.choose_move(&state, &mut rng).unwrap();
//! assert!(state.legal_moves().contains(&column));
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `iterations`: Number of iterations per move decision (default: 800)
//! - `exploration_constant`: Exploration weight for UCB1 (default: 1.41)
//!
//! # Architecture
//!
//! The tree is an arena of nodes addressed by [`NodeId`] indices: child
//! links are `(column, NodeId)` pairs and parent links are plain indices,
//! so backpropagation walks upward without shared-ownership cycles. Every
//! iteration operates on an exclusively owned scratch clone of the root
//! position; the tree is discarded after each move decision.

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use search::{MctsAgent, SearchError};
pub use tree::{MctsTree, TreeStats};
