use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};

use crate::{HEIGHT, WIDTH};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The other player's disc; `Empty` maps to itself
    pub fn opponent(self) -> Self {
        match self {
            Cell::PlayerOne => Cell::PlayerTwo,
            Cell::PlayerTwo => Cell::PlayerOne,
            Cell::Empty => Cell::Empty,
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::PlayerOne => 'X',
            Cell::PlayerTwo => 'O',
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameResult {
    Undetermined,
    PlayerOneWin,
    PlayerTwoWin,
    Tie,
}

impl GameResult {
    pub fn is_game_over(self) -> bool {
        self != GameResult::Undetermined
    }

    /// The winning disc, if either player has won
    pub fn winner(self) -> Option<Cell> {
        match self {
            GameResult::PlayerOneWin => Some(Cell::PlayerOne),
            GameResult::PlayerTwoWin => Some(Cell::PlayerTwo),
            _ => None,
        }
    }

    fn win_for(cell: Cell) -> Self {
        match cell {
            Cell::PlayerOne => GameResult::PlayerOneWin,
            Cell::PlayerTwo => GameResult::PlayerTwoWin,
            Cell::Empty => GameResult::Undetermined,
        }
    }
}

/// A single column of the board: a fixed-capacity stack of discs
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct Column {
    cells: [Cell; HEIGHT],
    height: u8,
}

impl Column {
    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn is_full(&self) -> bool {
        self.height as usize == HEIGHT
    }

    /// Cell contents at `row`, counted from the bottom; `Empty` above the stack
    pub fn get(&self, row: usize) -> Cell {
        self.cells[row]
    }

    pub fn push(&mut self, cell: Cell) -> Result<()> {
        if self.is_full() {
            bail!("cannot push into a full column");
        }
        self.cells[self.height as usize] = cell;
        self.height += 1;
        Ok(())
    }
}

/// The live game board: 7 column stacks, a disc counter and the cached
/// game result, updated incrementally on every move
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board {
    columns: [Column; WIDTH],
    num_discs: u8,
    result: GameResult,
}

impl Board {
    pub fn new() -> Self {
        Self {
            columns: [Column::default(); WIDTH],
            num_discs: 0,
            result: GameResult::Undetermined,
        }
    }

    // reassembles a board from raw column stacks, deriving the disc count
    // and recomputing the result tag from scratch
    pub(crate) fn from_columns(columns: [Column; WIDTH]) -> Self {
        let num_discs = columns.iter().map(|c| c.height() as u8).sum();
        let mut board = Self {
            columns,
            num_discs,
            result: GameResult::Undetermined,
        };
        board.result = board.full_scan_result();
        board
    }

    /// Replays a game given in digit notation, e.g. "44531" plays columns
    /// 4, 4, 5, 3 and 1 (one-indexed) with alternating discs
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for move_char in moves.as_ref().chars() {
            match move_char.to_digit(10) {
                Some(column) if (1..=WIDTH as u32).contains(&column) => {
                    board.play(column as u8 - 1)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", move_char)),
            }
        }
        Ok(board)
    }

    /// The disc of the player to move, a pure function of the disc count
    pub fn turn(&self) -> Cell {
        if self.num_discs % 2 == 0 {
            Cell::PlayerOne
        } else {
            Cell::PlayerTwo
        }
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn num_moves(&self) -> usize {
        self.num_discs as usize
    }

    pub fn is_full(&self) -> bool {
        self.num_discs as usize == WIDTH * HEIGHT
    }

    pub fn playable(&self, column: u8) -> bool {
        (column as usize) < WIDTH && !self.columns[column as usize].is_full()
    }

    /// Cell contents at (`column`, `row`), both zero-indexed from the
    /// bottom-left corner
    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.columns[column].get(row)
    }

    pub fn column(&self, column: usize) -> &Column {
        &self.columns[column]
    }

    /// The column indices still open for a move
    ///
    /// Fails if the board is already full.
    pub fn legal_moves(&self) -> Result<Vec<u8>> {
        if self.is_full() {
            bail!("no legal moves, the board is full");
        }
        Ok((0..WIDTH as u8).filter(|&c| self.playable(c)).collect())
    }

    /// Drops the current player's disc into `column`
    ///
    /// Returns the updated game result. Fails if the board is full, the
    /// game is already decided, or the column is out of range or full.
    pub fn play(&mut self, column: u8) -> Result<GameResult> {
        self.play_disc(column, self.turn())
    }

    /// Drops `disc` into `column`, also checking that it is that disc's turn
    pub fn play_disc(&mut self, column: u8, disc: Cell) -> Result<GameResult> {
        if self.is_full() {
            bail!("cannot play, the board is full");
        }
        if self.result.is_game_over() {
            bail!("cannot play, the game is already over");
        }
        if column as usize >= WIDTH {
            bail!(
                "column {} out of range, columns are 0 to {}",
                column,
                WIDTH - 1
            );
        }
        if disc.is_empty() {
            bail!("cannot play an empty cell as a disc");
        }
        if disc != self.turn() {
            bail!("it is not {:?}'s turn", disc);
        }
        if self.columns[column as usize].is_full() {
            bail!("column {} is full", column);
        }

        // evaluate the move before pushing, while the landing row is still
        // the column height
        let result = self.result_of_move(column as usize, disc);
        self.columns[column as usize].push(disc)?;
        self.num_discs += 1;
        self.result = result;

        Ok(self.result)
    }

    /// Plays `column` on a copy of the board
    pub fn with_move(&self, column: u8) -> Result<Board> {
        let mut next = *self;
        next.play(column)?;
        Ok(next)
    }

    /// The result the current player would produce by playing `column`,
    /// without mutating the board
    pub fn winning_move(&self, column: u8) -> Result<GameResult> {
        if column as usize >= WIDTH {
            bail!(
                "column {} out of range, columns are 0 to {}",
                column,
                WIDTH - 1
            );
        }
        if self.columns[column as usize].is_full() {
            bail!("column {} is full", column);
        }
        Ok(self.result_of_move(column as usize, self.turn()))
    }

    // game result after `cell` lands in `column`, checked by counting
    // contiguous discs outward from the landing cell along all four axes
    fn result_of_move(&self, column: usize, cell: Cell) -> GameResult {
        let row = self.columns[column].height();

        for &(dx, dy) in &[(1i32, 0i32), (0, 1), (1, 1), (1, -1)] {
            let mut run = 1;
            for &dir in &[-1i32, 1] {
                let mut x = column as i32 + dir * dx;
                let mut y = row as i32 + dir * dy;
                while self.cell_at(x, y) == cell {
                    run += 1;
                    x += dir * dx;
                    y += dir * dy;
                }
            }
            if run >= 4 {
                return GameResult::win_for(cell);
            }
        }

        if self.num_discs as usize + 1 == WIDTH * HEIGHT {
            GameResult::Tie
        } else {
            GameResult::Undetermined
        }
    }

    // bounds-checked cell access, `Empty` outside the board
    fn cell_at(&self, column: i32, row: i32) -> Cell {
        if column < 0 || column >= WIDTH as i32 || row < 0 || row >= HEIGHT as i32 {
            Cell::Empty
        } else {
            self.columns[column as usize].get(row as usize)
        }
    }

    /// Recomputes the game result by scanning the whole board, independent
    /// of the incrementally maintained tag
    pub fn full_scan_result(&self) -> GameResult {
        // the fastest possible win uses 7 discs
        if (self.num_discs as usize) < WIDTH {
            return GameResult::Undetermined;
        }

        // vertical
        for col in 0..WIDTH {
            for row in 0..HEIGHT - 3 {
                let cell = self.cell(col, row);
                if !cell.is_empty() && (1..4).all(|k| self.cell(col, row + k) == cell) {
                    return GameResult::win_for(cell);
                }
            }
        }

        // horizontal
        for col in 0..WIDTH - 3 {
            for row in 0..HEIGHT {
                let cell = self.cell(col, row);
                if !cell.is_empty() && (1..4).all(|k| self.cell(col + k, row) == cell) {
                    return GameResult::win_for(cell);
                }
            }
        }

        // diagonal /
        for col in 0..WIDTH - 3 {
            for row in 0..HEIGHT - 3 {
                let cell = self.cell(col, row);
                if !cell.is_empty() && (1..4).all(|k| self.cell(col + k, row + k) == cell) {
                    return GameResult::win_for(cell);
                }
            }
        }

        // diagonal \
        for col in 0..WIDTH - 3 {
            for row in 0..HEIGHT - 3 {
                let cell = self.cell(col, row + 3);
                if !cell.is_empty() && (1..4).all(|k| self.cell(col + k, row + 3 - k) == cell) {
                    return GameResult::win_for(cell);
                }
            }
        }

        if self.is_full() {
            GameResult::Tie
        } else {
            GameResult::Undetermined
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Renders the board as a text grid:
    ///
    /// ```text
    /// | | | | | | | |
    /// | | | | | | | |
    /// | | | | | | | |
    /// | | | | | | | |
    /// | |O| | | | | |
    /// |X|O|X| | | | |
    /// |1|2|3|4|5|6|7|
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            write!(f, "|")?;
            for col in 0..WIDTH {
                write!(f, "{}|", self.cell(col, row).to_char())?;
            }
            writeln!(f)?;
        }
        write!(f, "|")?;
        for col in 0..WIDTH {
            write!(f, "{}|", col + 1)?;
        }
        writeln!(f)
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    /// Parses the grid format produced by [`Display`](#impl-Display), top
    /// row first, with a column-number header as the last line
    fn from_str(s: &str) -> Result<Self> {
        const LINE_LEN: usize = 2 * WIDTH + 1;

        let lines: Vec<&str> = s.lines().collect();
        if lines.len() != HEIGHT + 1 {
            bail!(
                "malformed board: expected {} lines, found {}",
                HEIGHT + 1,
                lines.len()
            );
        }

        let header: String = {
            let mut h = String::from("|");
            for col in 0..WIDTH {
                h.push_str(&format!("{}|", col + 1));
            }
            h
        };
        if lines[HEIGHT] != header {
            bail!("malformed board: expected header '{}'", header);
        }

        let mut board = Board::new();
        // lines are top row first, so walk them in reverse to fill the
        // columns bottom-up
        for (line_no, line) in lines[..HEIGHT].iter().enumerate().rev() {
            let row = HEIGHT - 1 - line_no;
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != LINE_LEN || chars.iter().step_by(2).any(|&c| c != '|') {
                bail!("malformed board: bad row '{}'", line);
            }
            for col in 0..WIDTH {
                let cell = match chars[2 * col + 1] {
                    'X' | 'x' => Cell::PlayerOne,
                    'O' | 'o' => Cell::PlayerTwo,
                    ' ' => Cell::Empty,
                    other => bail!("malformed board: unexpected cell '{}'", other),
                };
                if !cell.is_empty() {
                    if board.columns[col].height() != row {
                        bail!("malformed board: floating disc in column {}", col + 1);
                    }
                    board.columns[col].push(cell)?;
                    board.num_discs += 1;
                }
            }
        }

        board.result = board.full_scan_result();
        Ok(board)
    }
}
