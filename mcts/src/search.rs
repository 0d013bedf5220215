//! MCTS search implementation.
//!
//! Implements the core MCTS loop:
//! 1. Selection: Traverse the tree using UCB1 to find a leaf
//! 2. Expansion: Add one child for a randomly chosen untried move
//! 3. Simulation: Play uniformly random moves to a terminal position
//! 4. Backpropagation: Update statistics along the path

use connect4::{GameState, Outcome};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The agent was asked to move on a full or already-terminal board.
    /// The caller should have checked the outcome before invoking it.
    #[error("No legal moves available")]
    NoLegalMoves,
}

/// Monte Carlo Tree Search move-selection agent for one side.
///
/// The agent is stateless between calls: each [`choose_move`] builds a
/// fresh tree rooted at a clone of the input position, runs the configured
/// number of iterations, and discards the tree once the move is returned.
/// It never retains a reference to the caller's state, so the caller is
/// free to mutate it as soon as the call returns.
///
/// [`choose_move`]: MctsAgent::choose_move
#[derive(Debug, Clone)]
pub struct MctsAgent {
    config: MctsConfig,
}

impl MctsAgent {
    /// Create an agent with the given configuration.
    pub fn new(config: MctsConfig) -> Self {
        Self { config }
    }

    /// The agent's configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Pick a column for the player to move in `state`.
    ///
    /// `state` must be an ongoing position with at least one legal move,
    /// with its most recent move fresh (outcome-checked by the caller);
    /// otherwise [`SearchError::NoLegalMoves`] is returned. The call
    /// blocks until all configured iterations have run. The returned
    /// column is always legal in `state`.
    pub fn choose_move(
        &self,
        state: &GameState,
        rng: &mut ChaCha20Rng,
    ) -> Result<u8, SearchError> {
        if state.outcome().is_over() || state.legal_moves().is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mut tree = MctsTree::new(state.clone());

        for iteration in 0..self.config.iterations {
            self.simulate(&mut tree, state, rng);
            trace!(iteration, nodes = tree.len(), "MCTS iteration complete");
        }

        let stats = tree.stats();
        debug!(
            total_nodes = stats.total_nodes,
            root_visits = stats.root_visits,
            root_children = stats.root_children,
            max_depth = stats.max_depth,
            "MCTS search finished"
        );

        // The first iteration always expands a root child, so this is only
        // None for a zero-iteration config.
        tree.best_move().ok_or(SearchError::NoLegalMoves)
    }

    /// Run a single iteration (select -> expand -> rollout -> backpropagate)
    /// on an exclusively owned scratch copy of the root position.
    fn simulate(&self, tree: &mut MctsTree, root_state: &GameState, rng: &mut ChaCha20Rng) {
        let mut node_id = tree.root();
        let mut scratch = root_state.clone();

        // Selection: descend while fully expanded, replaying each selected
        // move on the scratch state so it tracks the path exactly.
        loop {
            let node = tree.get(node_id);
            if !node.is_fully_expanded() || node.children.is_empty() {
                break;
            }

            match tree.select_child(node_id, self.config.exploration_constant) {
                Some(child_id) => {
                    let applied = scratch.apply_move(tree.get(child_id).column);
                    debug_assert!(applied, "selected child move must be legal");
                    node_id = child_id;
                }
                None => break,
            }
        }

        // Expansion: add one child for a random untried move.
        let untried = &tree.get(node_id).untried_moves;
        if !untried.is_empty() {
            let column = untried[rng.gen_range(0..untried.len())];
            let applied = scratch.apply_move(column);
            debug_assert!(applied, "untried move must be legal");
            node_id = tree.add_child(node_id, column, scratch.clone());
        }

        // Simulation: uniformly random play, checking the outcome after
        // every move so a win ends the rollout immediately.
        let mut outcome = scratch.outcome();
        while outcome == Outcome::Ongoing {
            let legal = scratch.legal_moves();
            let column = legal[rng.gen_range(0..legal.len())];
            scratch.apply_move(column);
            outcome = scratch.outcome();
        }

        // Backpropagation.
        tree.backpropagate(node_id, outcome);
    }
}

impl Default for MctsAgent {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect4::Player;
    use rand::SeedableRng;

    /// Red has three discs in column 3; Red to move, column 3 wins.
    fn red_wins_in_column_3() -> GameState {
        let mut state = GameState::default();
        for m in [3, 0, 3, 1, 3, 2] {
            assert!(state.apply_move(m));
        }
        assert_eq!(state.current_player(), Player::Red);
        assert_eq!(state.outcome(), Outcome::Ongoing);
        state
    }

    #[test]
    fn test_basic_search_returns_legal_move() {
        let agent = MctsAgent::new(MctsConfig::for_testing());
        let state = GameState::default();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let column = agent.choose_move(&state, &mut rng).unwrap();
        assert!(state.legal_moves().contains(&column));
    }

    #[test]
    fn test_search_is_deterministic_per_seed() {
        let agent = MctsAgent::new(MctsConfig::for_testing());
        let state = red_wins_in_column_3();

        let mut rng_a = ChaCha20Rng::seed_from_u64(7);
        let mut rng_b = ChaCha20Rng::seed_from_u64(7);

        assert_eq!(
            agent.choose_move(&state, &mut rng_a),
            agent.choose_move(&state, &mut rng_b)
        );
    }

    #[test]
    fn test_finds_immediate_winning_move() {
        // Probabilistic property: with enough iterations, the agent picks
        // the forced win in a large majority of independent seeded trials.
        let agent = MctsAgent::new(MctsConfig::default().with_iterations(500));
        let state = red_wins_in_column_3();

        let mut hits = 0;
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            if agent.choose_move(&state, &mut rng).unwrap() == 3 {
                hits += 1;
            }
        }
        assert!(hits >= 8, "winning column chosen only {hits}/10 times");
    }

    #[test]
    fn test_blocks_immediate_opponent_win() {
        // Red threatens column 3; Yellow to move must answer there.
        let mut state = GameState::default();
        for m in [3, 0, 3, 1, 3] {
            assert!(state.apply_move(m));
        }
        assert_eq!(state.current_player(), Player::Yellow);

        let agent = MctsAgent::new(MctsConfig::default());
        let mut hits = 0;
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            if agent.choose_move(&state, &mut rng).unwrap() == 3 {
                hits += 1;
            }
        }
        assert!(hits >= 8, "blocking column chosen only {hits}/10 times");
    }

    #[test]
    fn test_never_returns_full_column() {
        // Fill column 0 entirely, then search many times.
        let mut state = GameState::default();
        for _ in 0..3 {
            state.apply_move(0); // Red
            state.apply_move(1); // Yellow
            state.apply_move(1); // Red
            state.apply_move(0); // Yellow
        }
        assert!(!state.legal_moves().contains(&0));
        assert_eq!(state.outcome(), Outcome::Ongoing);

        let agent = MctsAgent::new(MctsConfig::for_testing());
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let column = agent.choose_move(&state, &mut rng).unwrap();
            assert_ne!(column, 0, "returned a full column (seed={seed})");
            assert!(state.legal_moves().contains(&column));
        }
    }

    #[test]
    fn test_rejects_terminal_position() {
        let mut state = red_wins_in_column_3();
        state.apply_move(3); // Red wins
        assert!(state.outcome().is_over());

        let agent = MctsAgent::new(MctsConfig::for_testing());
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(
            agent.choose_move(&state, &mut rng),
            Err(SearchError::NoLegalMoves)
        );
    }

    #[test]
    fn test_rejects_single_column_board_when_full() {
        // A 2x1 board fills after two moves with no possible win.
        let mut state = GameState::new(2, 1, Player::Red);
        assert!(state.apply_move(0));
        assert!(state.apply_move(0));
        assert_eq!(state.outcome(), Outcome::Draw);

        let agent = MctsAgent::new(MctsConfig::for_testing());
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(
            agent.choose_move(&state, &mut rng),
            Err(SearchError::NoLegalMoves)
        );
    }

    #[test]
    fn test_input_state_is_not_mutated() {
        let state = red_wins_in_column_3();
        let before = state.clone();

        let agent = MctsAgent::new(MctsConfig::for_testing());
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        agent.choose_move(&state, &mut rng).unwrap();

        assert_eq!(state, before);
    }

    #[test]
    fn test_single_legal_move() {
        // A 1x3 board with two columns taken leaves a single legal move.
        let mut state = GameState::new(1, 3, Player::Red);
        state.apply_move(0);
        state.apply_move(1);
        assert_eq!(state.legal_moves(), vec![2]);

        let agent = MctsAgent::new(MctsConfig::for_testing());
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(agent.choose_move(&state, &mut rng), Ok(2));
    }

    #[test]
    fn test_agents_play_a_full_game() {
        // Two independently configured agents finish a legal game.
        let strong = MctsAgent::new(MctsConfig::for_testing().with_iterations(150));
        let weak = MctsAgent::new(MctsConfig::for_testing().with_iterations(30));
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let mut state = GameState::default();
        while !state.outcome().is_over() {
            let agent = match state.current_player() {
                Player::Red => &strong,
                Player::Yellow => &weak,
            };
            let column = agent.choose_move(&state, &mut rng).unwrap();
            assert!(state.apply_move(column));
        }

        assert!(state.moves_played() <= state.rows() * state.columns());
    }
}
