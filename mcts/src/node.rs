//! MCTS tree node representation.
//!
//! Each node represents a game position reached by dropping a disc from the
//! parent's position. Nodes store the visit and win accumulators used for
//! UCB1 selection.

use connect4::GameState;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Column played from the parent to reach this node (unused at the root)
    pub column: u8,

    /// Owned copy of the game position at this node
    pub state: GameState,

    /// Legal columns not yet expanded into a child. Empty for terminal
    /// positions, so the search never plays past a finished game.
    pub untried_moves: Vec<u8>,

    /// Children: Vec of (column, NodeId) pairs, in expansion order
    pub children: Vec<(u8, NodeId)>,

    /// Number of times this node has been visited by backpropagation
    pub visit_count: u32,

    /// Rollouts through this node won by the player to move here
    pub win_count: u32,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(state: GameState) -> Self {
        Self::new(NodeId::NONE, 0, state)
    }

    /// Create a new child node reached by playing `column` from `parent`.
    pub fn new_child(parent: NodeId, column: u8, state: GameState) -> Self {
        Self::new(parent, column, state)
    }

    fn new(parent: NodeId, column: u8, state: GameState) -> Self {
        let untried_moves = if state.outcome().is_over() {
            Vec::new()
        } else {
            state.legal_moves()
        };

        Self {
            parent,
            column,
            state,
            untried_moves,
            children: Vec::new(),
            visit_count: 0,
            win_count: 0,
        }
    }

    /// Fraction of visits won by the player to move at this node.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_count as f32 / self.visit_count as f32
        }
    }

    /// Calculate the UCB1 score for child selection.
    /// UCB1(child) = (1 - win_rate) + c * sqrt(2 * ln(N_parent) / N_child)
    ///
    /// Higher scores are better (more promising to explore).
    ///
    /// IMPORTANT: `win_rate` is from this node's perspective (the player
    /// whose turn it is here). When the parent selects among children it
    /// needs the complement, because the child represents the opponent's
    /// position: a child the opponent rarely wins from is a good move for
    /// the selecting player.
    ///
    /// Only call on visited nodes with a visited parent; selection
    /// guarantees both, since children are created by expansion and each
    /// expansion is followed by a backpropagation that visits the new
    /// child and every ancestor.
    ///
    /// Note: Takes pre-computed ln(parent_visits) to avoid redundant log
    /// calls when comparing multiple children.
    #[inline]
    pub fn ucb_score(&self, parent_visits_ln: f32, exploration: f32) -> f32 {
        let exploit = 1.0 - self.win_rate();
        let explore = exploration * (2.0 * parent_visits_ln / self.visit_count as f32).sqrt();
        exploit + explore
    }

    /// Whether every legal move from this position has a child node.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Whether the position at this node is finished.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.untried_moves.is_empty() && self.children.is_empty() && self.state.outcome().is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect4::{GameState, Player};

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(GameState::default());

        assert!(node.parent.is_none());
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.win_count, 0);
        assert!(node.children.is_empty());
        assert_eq!(node.untried_moves, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(!node.is_fully_expanded());
    }

    #[test]
    fn test_terminal_node_has_no_untried_moves() {
        // Red wins in column 0; the side columns still have room, but a
        // finished position must not be expandable.
        let mut state = GameState::default();
        for _ in 0..3 {
            state.apply_move(0); // Red
            state.apply_move(1); // Yellow
        }
        state.apply_move(0); // Red - four in column 0
        assert!(state.outcome().is_over());

        let node = MctsNode::new_child(NodeId(0), 0, state);
        assert!(node.untried_moves.is_empty());
        assert!(node.is_terminal());
    }

    #[test]
    fn test_win_rate() {
        let mut node = MctsNode::new_root(GameState::default());

        // Unvisited
        assert!(node.win_rate().abs() < 1e-6);

        node.visit_count = 4;
        node.win_count = 3;
        assert!((node.win_rate() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = MctsNode::new_root(GameState::new(6, 7, Player::Red));
        node.visit_count = 10;
        node.win_count = 5;

        let parent_visits = 100u32;
        let parent_visits_ln = (parent_visits as f32).ln();

        // UCB1 = (1 - 0.5) + 1.0 * sqrt(2 * ln(100) / 10)
        //      = 0.5 + sqrt(0.9210...) = 0.5 + 0.9597... ~= 1.4597
        let ucb = node.ucb_score(parent_visits_ln, 1.0);
        assert!((ucb - 1.4597).abs() < 0.01);

        // Exploration weight scales only the exploration term
        let ucb_heavy = node.ucb_score(parent_visits_ln, 2.0);
        assert!((ucb_heavy - (0.5 + 2.0 * 0.9597)).abs() < 0.01);
    }

    #[test]
    fn test_ucb_prefers_rarely_visited_child() {
        let mut often = MctsNode::new_root(GameState::default());
        often.visit_count = 90;
        often.win_count = 45;

        let mut rarely = MctsNode::new_root(GameState::default());
        rarely.visit_count = 10;
        rarely.win_count = 5;

        let parent_visits_ln = (100f32).ln();
        assert!(
            rarely.ucb_score(parent_visits_ln, 1.41) > often.ucb_score(parent_visits_ln, 1.41)
        );
    }
}
