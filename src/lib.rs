//! A game engine and solver for the board game 'Connect 4'
//!
//! The engine keeps a live column-stack board with incremental win
//! detection, compresses positions to a 7-byte key, and searches the game
//! tree with a depth-bounded negamax that memoizes proven results in an
//! open-addressing transposition table.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::{board::Board, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::from_moves("112233")?;
//! let mut solver = Solver::new(6);
//! let best_move = solver.best_move(&board, 6)?;
//!
//! assert_eq!(best_move, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod hash_table;

pub mod board;

pub mod compressed;

pub mod solver;

pub mod rng;

pub mod agents;


pub use crate::board::{Board, Cell, GameResult};
pub use crate::compressed::CompressedBoard;
pub use crate::hash_table::HashTable;
pub use crate::solver::{Evaluation, Solver};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// each compressed column must fit its height bits below the top-color bit
const_assert!(HEIGHT + 1 < 8);

// plies-until-over counters must fit in an i8
const_assert!(WIDTH * HEIGHT <= 127);
