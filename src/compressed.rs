//! Bit-packed board representation used as the transposition-table key
//!
//! Each column packs into one byte: bit 7 holds the color of the topmost
//! disc, and bits 0..height-1 record, bottom-up, whether each cell matches
//! that color. The height is recovered as the highest set low bit, so the
//! encoding is lossless and an empty column is the zero byte.

use static_assertions::*;

use crate::board::{Board, Cell, Column};
use crate::{HEIGHT, WIDTH};

const TOP_COLOR_BIT: u8 = 7;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct CompressedColumn(u8);

impl CompressedColumn {
    pub fn compress(column: &Column) -> Self {
        let height = column.height();
        if height == 0 {
            return Self(0);
        }
        let top = column.get(height - 1);

        let mut data = ((top == Cell::PlayerOne) as u8) << TOP_COLOR_BIT;
        for row in 0..height {
            data |= ((column.get(row) == top) as u8) << row;
        }
        Self(data)
    }

    pub fn decompress(self) -> Column {
        let mut column = Column::default();
        if self.0 == 0 {
            return column;
        }

        let top = if self.0 >> TOP_COLOR_BIT != 0 {
            Cell::PlayerOne
        } else {
            Cell::PlayerTwo
        };
        for row in 0..self.height() {
            let cell = if self.0 & (1 << row) != 0 {
                top
            } else {
                top.opponent()
            };
            // height() is at most HEIGHT, the push cannot fail
            let _ = column.push(cell);
        }
        column
    }

    /// Number of discs in the column: one past the highest set height bit
    pub fn height(self) -> usize {
        for row in (0..HEIGHT).rev() {
            if self.0 & (1 << row) != 0 {
                return row + 1;
            }
        }
        0
    }
}

/// A whole board compressed to one byte per column
///
/// Two boards are equal exactly when their compressed forms are equal,
/// which makes this the natural key type for the transposition table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct CompressedBoard([CompressedColumn; WIDTH]);

impl CompressedBoard {
    pub fn compress(board: &Board) -> Self {
        let mut columns = [CompressedColumn::default(); WIDTH];
        for (col, compressed) in columns.iter_mut().enumerate() {
            *compressed = CompressedColumn::compress(board.column(col));
        }
        Self(columns)
    }

    /// Reconstructs the full board, recomputing the result tag with a full
    /// scan since it is not part of the compressed form
    pub fn decompress(self) -> Board {
        let mut columns = [Column::default(); WIDTH];
        for (col, compressed) in self.0.iter().enumerate() {
            columns[col] = compressed.decompress();
        }
        Board::from_columns(columns)
    }
}

assert_eq_size!(CompressedBoard, [u8; WIDTH]);
