//! Connect Four game state for the search engine.
//!
//! Connect Four is a two-player connection game where players drop discs
//! into a vertically suspended grid. The first player to line up four of
//! their discs horizontally, vertically, or diagonally wins.
//!
//! Unlike a bare board type, [`GameState`] is built for tree search: moves
//! are applied in place and can be undone exactly, and terminal detection
//! only inspects the lines through the most recently played cell.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! # Usage
//!
//! ```rust
//! use connect4::{GameState, Outcome, Player};
//!
//! let mut state = GameState::default(); // 6x7, Red to move
//! assert!(state.apply_move(3));
//! assert_eq!(state.current_player(), Player::Yellow);
//! assert_eq!(state.outcome(), Outcome::Ongoing);
//! ```

use std::fmt;

use thiserror::Error;

/// Default board dimensions (the standard Connect Four grid).
pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;

/// Number of aligned discs required to win.
pub const CONNECT: usize = 4;

/// Errors reported by [`GameState`].
///
/// A full or out-of-range column is a routine condition, not an error, and
/// is signaled by `apply_move` returning `false`. Undoing with no history
/// is a caller bug: the engine never calls undo itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("No moves to undo")]
    EmptyHistory,
}

/// One of the two sides. Red moves first on a fresh board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Yellow,
}

impl Player {
    /// The opposing side.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => write!(f, "Red"),
            Player::Yellow => write!(f, "Yellow"),
        }
    }
}

/// Result of a terminal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game is still in progress.
    Ongoing,
    /// The board is full with no winner.
    Draw,
    /// The given player has four in a row.
    Win(Player),
}

impl Outcome {
    /// Whether the game has ended.
    #[inline]
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// Connect Four game state.
///
/// Holds the board, whose turn it is, per-column heights, and the move
/// history needed to support undo and last-move outcome checking.
///
/// Invariants: for every column `c`, cells below `column_height(c)` are
/// occupied and cells at or above it are empty, and the sum of all column
/// heights equals the number of moves in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    rows: usize,
    columns: usize,
    /// Row-major cells, row 0 at the bottom. `None` = empty.
    board: Vec<Option<Player>>,
    current_player: Player,
    /// Number of occupied cells per column.
    column_heights: Vec<usize>,
    /// Columns played, in application order.
    move_history: Vec<u8>,
}

impl GameState {
    /// Create an empty board with the given dimensions and starting player.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or if `columns` does not fit the
    /// `u8` column index space.
    pub fn new(rows: usize, columns: usize, first_player: Player) -> Self {
        assert!(rows > 0 && columns > 0, "board dimensions must be positive");
        assert!(columns <= u8::MAX as usize, "column index must fit in u8");

        Self {
            rows,
            columns,
            board: vec![None; rows * columns],
            current_player: first_player,
            column_heights: vec![0; columns],
            move_history: Vec::with_capacity(rows * columns),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The player whose turn it is.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Cell content at (row, col), row 0 at the bottom.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.board[self.pos(row, col)]
    }

    /// Number of occupied cells in a column.
    #[inline]
    pub fn column_height(&self, col: usize) -> usize {
        self.column_heights[col]
    }

    /// Total number of moves played so far.
    #[inline]
    pub fn moves_played(&self) -> usize {
        self.move_history.len()
    }

    /// The most recently played column, if any.
    #[inline]
    pub fn last_move(&self) -> Option<u8> {
        self.move_history.last().copied()
    }

    /// Convert row and column to a board index.
    #[inline]
    fn pos(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Drop the current player's disc into the lowest empty cell of `column`.
    ///
    /// On success the column height grows, the move is recorded, the turn
    /// flips, and `true` is returned. An out-of-range or full column leaves
    /// the state untouched and returns `false`; callers validating input
    /// should consult [`legal_moves`](Self::legal_moves) first.
    pub fn apply_move(&mut self, column: u8) -> bool {
        let col = column as usize;
        if col >= self.columns || self.column_heights[col] >= self.rows {
            return false;
        }

        let row = self.column_heights[col];
        let pos = self.pos(row, col);
        self.board[pos] = Some(self.current_player);
        self.column_heights[col] += 1;
        self.move_history.push(column);
        self.current_player = self.current_player.other();
        true
    }

    /// Undo the most recent move, restoring the exact prior state.
    ///
    /// Fails with [`GameError::EmptyHistory`] on a fresh board; the engine
    /// never undoes on its own, so hitting that error is a caller bug.
    pub fn undo_last_move(&mut self) -> Result<(), GameError> {
        let column = self.move_history.pop().ok_or(GameError::EmptyHistory)?;
        let col = column as usize;

        self.column_heights[col] -= 1;
        let pos = self.pos(self.column_heights[col], col);
        self.board[pos] = None;
        self.current_player = self.current_player.other();
        Ok(())
    }

    /// Columns that still have room, in ascending order.
    ///
    /// Note that this is a pure board-capacity check: it does not consult
    /// [`outcome`](Self::outcome), so a won position still reports the
    /// non-full columns. Callers deciding whether to keep playing must
    /// check the outcome themselves.
    pub fn legal_moves(&self) -> Vec<u8> {
        (0..self.columns as u8)
            .filter(|&col| self.column_heights[col as usize] < self.rows)
            .collect()
    }

    /// Terminal outcome of the position.
    ///
    /// For efficiency only the four axes through the most recently played
    /// cell are examined. This is correct only when the outcome is queried
    /// right after a move: every `apply_move` (and every move inside a
    /// search rollout) must be followed by its own outcome check before
    /// further moves are applied. Querying a position whose most recent
    /// move is stale (e.g. after interleaving unrelated applies and undos)
    /// can miss a win formed by an earlier move.
    pub fn outcome(&self) -> Outcome {
        let Some(last) = self.move_history.last() else {
            return Outcome::Ongoing;
        };

        let col = *last as usize;
        let row = self.column_heights[col] - 1;
        let player = self.board[self.pos(row, col)].expect("last-move cell is occupied");

        // Axis directions: vertical, horizontal, both diagonals.
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dr, dc) in directions {
            let count = 1 // The pivot itself.
                + self.count_from(row, col, player, dr, dc)
                + self.count_from(row, col, player, -dr, -dc);
            if count >= CONNECT {
                return Outcome::Win(player);
            }
        }

        if self.move_history.len() == self.rows * self.columns {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// Count contiguous same-player cells walking from (row, col) in the
    /// given direction, excluding the starting cell.
    fn count_from(&self, row: usize, col: usize, player: Player, dr: i32, dc: i32) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row as i32 + dr, col as i32 + dc);

        while r >= 0
            && r < self.rows as i32
            && c >= 0
            && c < self.columns as i32
            && self.board[self.pos(r as usize, c as usize)] == Some(player)
        {
            count += 1;
            r += dr;
            c += dc;
        }

        count
    }
}

impl Default for GameState {
    /// The standard 6x7 board with Red to move.
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, Player::Red)
    }
}

impl fmt::Display for GameState {
    /// ASCII rendering, top row first, with a column-index footer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            write!(f, "|")?;
            for col in 0..self.columns {
                let glyph = match self.cell(row, col) {
                    Some(Player::Red) => 'R',
                    Some(Player::Yellow) => 'Y',
                    None => '.',
                };
                write!(f, "{glyph}|")?;
            }
            writeln!(f)?;
        }
        for col in 0..self.columns {
            write!(f, " {}", col % 10)?;
        }
        Ok(())
    }
}
