//! A depth-bounded game tree search with a transposition cache
//!
//! The search is a negamax: every recursive call evaluates the position
//! for the side to move, and [`Evaluation::incremented`] translates a
//! child's result into the parent's frame. Proven game-over results are
//! memoized in an open-addressing table keyed by the compressed board;
//! depth-relative neutral results are never cached, since they would be
//! unsound to reuse at a different remaining depth.

use std::cmp::Ordering;
use std::fmt;

use anyhow::{anyhow, bail, Result};
use rayon::prelude::*;

use crate::board::{Board, GameResult};
use crate::compressed::CompressedBoard;
use crate::hash_table::HashTable;
use crate::WIDTH;

/// The value of a position from the perspective of the player to move
///
/// Four meaningful states: neutral (nothing proven within the searched
/// depth), winning, losing, and tied (both flags set, by convention).
/// `plies` counts single moves until the game is over for proven results.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Evaluation {
    winning: bool,
    losing: bool,
    plies: i8,
}

impl Evaluation {
    pub const NEUTRAL: Self = Self {
        winning: false,
        losing: false,
        plies: 0,
    };
    pub const WINNING: Self = Self {
        winning: true,
        losing: false,
        plies: 0,
    };
    pub const LOSING: Self = Self {
        winning: false,
        losing: true,
        plies: 0,
    };
    pub const TIED: Self = Self {
        winning: true,
        losing: true,
        plies: 0,
    };

    pub fn is_winning(self) -> bool {
        self.winning && !self.losing
    }

    pub fn is_losing(self) -> bool {
        self.losing && !self.winning
    }

    pub fn is_tied(self) -> bool {
        self.winning && self.losing
    }

    pub fn is_game_over(self) -> bool {
        self.winning || self.losing
    }

    /// Moves until the game is over; meaningful only for proven results
    pub fn plies_until_over(self) -> i8 {
        self.plies
    }

    /// This result viewed one ply earlier, from the opponent's perspective:
    /// winning and losing swap and the distance grows by one, so a win
    /// becomes a loss, a tie stays a tie, and neutral passes through
    /// unchanged
    pub fn incremented(self) -> Self {
        if self.is_game_over() {
            Self {
                winning: self.losing,
                losing: self.winning,
                plies: self.plies + 1,
            }
        } else {
            self
        }
    }

    // 2 = winning, 1 = tied or neutral, 0 = losing
    fn rank(self) -> u8 {
        if self.is_winning() {
            2
        } else if self.is_losing() {
            0
        } else {
            1
        }
    }
}

impl PartialOrd for Evaluation {
    /// Winning beats everything else, and a faster win beats a slower one;
    /// losing is worse than everything else, and a slower loss beats a
    /// faster one. Tied and neutral results sit between as a single band:
    /// distinct values inside the band are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.rank() != other.rank() {
            Some(self.rank().cmp(&other.rank()))
        } else if self.is_winning() {
            Some(other.plies.cmp(&self.plies))
        } else if self.is_losing() {
            Some(self.plies.cmp(&other.plies))
        } else if self == other {
            Some(Ordering::Equal)
        } else {
            None
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tied() {
            write!(f, "TIED")
        } else if self.is_winning() {
            write!(f, "WINNING")
        } else if self.is_losing() {
            write!(f, "LOSING")
        } else {
            write!(f, "NEUTRAL")
        }
    }
}

/// Returns the column indices ordered from the middle outwards, as the
/// middle columns are the strongest moves on average
pub const fn move_order() -> [u8; WIDTH] {
    let mut move_order = [0u8; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = ((WIDTH / 2) + (i % 2) * (i / 2 + 1) - (1 - i % 2) * (i / 2)) as u8;
        i += 1;
    }
    move_order
}

// sentinel for a decided board, oriented to the side to move (who, after a
// win, is necessarily the loser)
fn terminal_evaluation(board: &Board) -> Option<Evaluation> {
    match board.result() {
        GameResult::PlayerOneWin | GameResult::PlayerTwoWin => {
            if board.result().winner() == Some(board.turn()) {
                Some(Evaluation::WINNING)
            } else {
                Some(Evaluation::LOSING)
            }
        }
        GameResult::Tie => Some(Evaluation::TIED),
        GameResult::Undetermined => None,
    }
}

/// An agent that evaluates positions by depth-bounded tree search
#[derive(Clone)]
pub struct Solver {
    depth: u32,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
    table: HashTable<CompressedBoard, Evaluation>,
}

impl Solver {
    /// Creates a solver with the given default depth budget
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            node_count: 0,
            table: HashTable::new(),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of proven positions held in the transposition cache
    pub fn cache_len(&self) -> usize {
        self.table.len()
    }

    /// Evaluates the position for the side to move, searching `depth` plies
    ///
    /// Proven results bubble up exactly; a search that runs out of depth
    /// reports [`Evaluation::NEUTRAL`].
    pub fn evaluate(&mut self, board: &Board, depth: u32) -> Evaluation {
        self.node_count += 1;

        if let Some(sentinel) = terminal_evaluation(board) {
            return sentinel;
        }
        if depth == 0 {
            return Evaluation::NEUTRAL;
        }

        let key = CompressedBoard::compress(board);
        if let Some(&cached) = self.table.find(&key) {
            return cached;
        }

        let mut best = Evaluation::LOSING;
        for &column in move_order().iter() {
            if !board.playable(column) {
                continue;
            }
            let next = board
                .with_move(column)
                .expect("playable column on a live board");
            let eval = self.evaluate(&next, depth - 1).incremented();
            if eval > best {
                best = eval;
            }
            // nothing beats a proven win, skip the remaining siblings
            if eval.is_winning() {
                break;
            }
        }

        // only exact game-over results are sound to reuse at any depth
        if best.is_game_over() {
            self.table.insert_or_update(key, best);
        }
        best
    }

    /// Picks the best column for the side to move, searching `depth` plies
    ///
    /// Fails if the game is already decided; callers should check
    /// [`Board::result`] first.
    pub fn best_move(&mut self, board: &Board, depth: u32) -> Result<u8> {
        if board.result().is_game_over() {
            bail!("cannot search, the game is already over");
        }

        let mut best_move = None;
        let mut best_eval = Evaluation::LOSING;
        for &column in move_order().iter() {
            if !board.playable(column) {
                continue;
            }
            let next = board.with_move(column)?;
            let eval = self
                .evaluate(&next, depth.saturating_sub(1))
                .incremented();
            if best_move.is_none() || eval > best_eval {
                best_move = Some(column);
                best_eval = eval;
            }
        }

        best_move.ok_or_else(|| anyhow!("no playable columns"))
    }
}

impl crate::agents::MoveSelector for Solver {
    fn select_move(&mut self, board: &Board) -> Result<u8> {
        let depth = self.depth;
        self.best_move(board, depth)
    }
}

/// Parallel variant of [`Solver::best_move`]
///
/// The top two recursion levels fan out with one task per legal move; all
/// tasks join before the results are compared, so the early exit on a
/// proven win only applies below the fan-out. Every sequential subtree
/// owns a private transposition table, since the table's growth is not
/// safe for concurrent writers.
pub fn parallel_best_move(board: &Board, depth: u32) -> Result<u8> {
    if board.result().is_game_over() {
        bail!("cannot search, the game is already over");
    }

    let columns: Vec<u8> = move_order()
        .iter()
        .copied()
        .filter(|&c| board.playable(c))
        .collect();

    let evals: Vec<(u8, Evaluation)> = columns
        .par_iter()
        .map(|&column| {
            let next = board
                .with_move(column)
                .expect("playable column on a live board");
            let eval = evaluate_fanned(&next, depth.saturating_sub(1), 1).incremented();
            (column, eval)
        })
        .collect();

    let mut best_move = None;
    let mut best_eval = Evaluation::LOSING;
    for (column, eval) in evals {
        if best_move.is_none() || eval > best_eval {
            best_move = Some(column);
            best_eval = eval;
        }
    }

    best_move.ok_or_else(|| anyhow!("no playable columns"))
}

// one further level of fan-out below the root, then sequential search with
// a task-local table
fn evaluate_fanned(board: &Board, depth: u32, fan_out: u32) -> Evaluation {
    if let Some(sentinel) = terminal_evaluation(board) {
        return sentinel;
    }
    if depth == 0 {
        return Evaluation::NEUTRAL;
    }
    if fan_out == 0 {
        return Solver::new(depth).evaluate(board, depth);
    }

    let columns: Vec<u8> = move_order()
        .iter()
        .copied()
        .filter(|&c| board.playable(c))
        .collect();

    let evals: Vec<Evaluation> = columns
        .par_iter()
        .map(|&column| {
            let next = board
                .with_move(column)
                .expect("playable column on a live board");
            evaluate_fanned(&next, depth - 1, fan_out - 1).incremented()
        })
        .collect();

    let mut best = Evaluation::LOSING;
    for eval in evals {
        if eval > best {
            best = eval;
        }
    }
    best
}
