//! Simple move-selection agents
//!
//! The [`MoveSelector`] trait is the only polymorphism the engine needs: a
//! single callable producing a column for the side to move. The solver
//! implements it too, so games can mix search-based and trivial players.

use anyhow::Result;

use crate::board::Board;
use crate::rng::XorShift;

/// Anything that can pick a column for the player to move
pub trait MoveSelector {
    fn select_move(&mut self, board: &Board) -> Result<u8>;
}

/// Plays a uniformly random legal column
pub struct RandomAgent {
    rng: XorShift,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: XorShift::new(seed),
        }
    }
}

impl MoveSelector for RandomAgent {
    fn select_move(&mut self, board: &Board) -> Result<u8> {
        let moves = board.legal_moves()?;
        Ok(moves[self.rng.next_below(moves.len())])
    }
}

/// Takes an immediate game-ending move when one exists, otherwise plays
/// randomly
pub struct OneMoveAgent {
    fallback: RandomAgent,
}

impl OneMoveAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            fallback: RandomAgent::new(seed),
        }
    }
}

impl MoveSelector for OneMoveAgent {
    fn select_move(&mut self, board: &Board) -> Result<u8> {
        for column in board.legal_moves()? {
            if board.winning_move(column)?.is_game_over() {
                return Ok(column);
            }
        }
        self.fallback.select_move(board)
    }
}
