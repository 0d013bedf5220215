//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec and
//! referenced by NodeId indices; parent links are plain indices, so the
//! upward walk of backpropagation needs no shared ownership.

use connect4::{GameState, Outcome};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at the given position.
    pub fn new(root_state: GameState) -> Self {
        let root_node = MctsNode::new_root(root_state);
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the best child of a node using UCB1.
    /// Ties go to the first maximal child in list order.
    /// Returns None if the node has no children.
    pub fn select_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute the log once instead of per-child comparison
        let parent_visits_ln = (node.visit_count as f32).ln();

        let mut best: Option<(f32, NodeId)> = None;
        for &(_, child_id) in &node.children {
            let score = self.get(child_id).ucb_score(parent_visits_ln, exploration);
            match best {
                Some((best_score, _)) if score <= best_score => {}
                _ => best = Some((score, child_id)),
            }
        }

        best.map(|(_, id)| id)
    }

    /// Add a child reached by playing `column` from `parent_id`, consuming
    /// that column from the parent's untried moves.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, column: u8, state: GameState) -> NodeId {
        let child = MctsNode::new_child(parent_id, column, state);
        let child_id = self.allocate(child);

        let parent = self.get_mut(parent_id);
        if let Some(idx) = parent.untried_moves.iter().position(|&m| m == column) {
            parent.untried_moves.swap_remove(idx);
        }
        parent.children.push((column, child_id));

        child_id
    }

    /// Backpropagate a terminal outcome from a leaf to the root inclusive.
    ///
    /// Every node on the path gains a visit; a node additionally gains a
    /// win when the outcome is a victory for the player whose turn it is
    /// at that node. Draws count as a win for neither side.
    pub fn backpropagate(&mut self, leaf_id: NodeId, outcome: Outcome) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            if outcome == Outcome::Win(node.state.current_player()) {
                node.win_count += 1;
            }

            current_id = node.parent;
        }
    }

    /// Get the most-visited move from the root (the standard MCTS
    /// robustness criterion, rather than the highest win rate).
    /// Ties go to the first maximal child in list order.
    /// Returns None if the root has no children.
    pub fn best_move(&self) -> Option<u8> {
        let root = self.get(self.root);

        let mut best: Option<(u32, u8)> = None;
        for &(column, child_id) in &root.children {
            let visits = self.get(child_id).visit_count;
            match best {
                Some((best_visits, _)) if visits <= best_visits => {}
                _ => best = Some((visits, column)),
            }
        }

        best.map(|(_, column)| column)
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_children: root.children.len(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_children: usize,
    pub max_depth: u32,
}
