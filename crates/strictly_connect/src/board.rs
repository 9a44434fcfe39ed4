//! Board grid, seats and gravity drops.

use std::ops::Range;

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::GameError;

/// One of the two roles in a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Seat {
    /// First seat (stored as `1` in save files).
    A,
    /// Second seat (stored as `2` in save files).
    B,
}

impl Seat {
    /// Returns the opposing seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    /// Index into a two-element seat array.
    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No piece.
    #[default]
    Empty,
    /// Piece owned by a seat.
    Occupied(Seat),
}

impl Cell {
    /// Save-file code: 0 empty, 1 seat A, 2 seat B.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(Seat::A) => 1,
            Cell::Occupied(Seat::B) => 2,
        }
    }

    /// Parses a save-file code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Occupied(Seat::A)),
            2 => Some(Cell::Occupied(Seat::B)),
            _ => None,
        }
    }

    /// Returns the owning seat, if any.
    pub fn seat(self) -> Option<Seat> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(seat) => Some(seat),
        }
    }
}

/// Which way a wide run extends from its target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Extension {
    /// Target column is the rightmost column of the run.
    #[default]
    Leftward,
    /// Target column is the leftmost column of the run.
    Rightward,
}

impl Extension {
    /// Protocol token selecting [`Extension::Rightward`].
    pub const RIGHTWARD_MARKER: &'static str = "D";

    /// Interprets an optional direction token. Only the exact marker
    /// selects rightward extension; anything else extends leftward.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some(Self::RIGHTWARD_MARKER) => Extension::Rightward,
            _ => Extension::Leftward,
        }
    }

    fn factor(self) -> i64 {
        match self {
            Extension::Rightward => 0,
            Extension::Leftward => -1,
        }
    }
}

/// Leftmost 0-indexed column of a run of `size` pieces aimed at the
/// 1-indexed `column`. May be negative or past the board edge; `None`
/// when the arithmetic leaves the `i64` range.
pub fn leftmost_column(size: i64, column: i64, extension: Extension) -> Option<i64> {
    let offset = size.checked_sub(1)?.checked_mul(extension.factor())?;
    column.checked_sub(1)?.checked_add(offset)
}

/// A cell filled by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Placement {
    /// Row the piece came to rest on (0 is the top).
    pub row: usize,
    /// Column of the piece (0-indexed).
    pub column: usize,
}

/// Height x width grid. Row 0 is the top; gravity pulls toward the last row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    height: usize,
    width: usize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets the cell at the given position.
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if row >= self.height || column >= self.width {
            return None;
        }
        self.cells.get(row * self.width + column).copied()
    }

    /// Sets the cell at the given position.
    pub fn set(&mut self, row: usize, column: usize, cell: Cell) -> Result<(), &'static str> {
        if row >= self.height || column >= self.width {
            return Err("Position out of bounds");
        }
        self.cells[row * self.width + column] = cell;
        Ok(())
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// True when the column's top cell holds a piece.
    pub fn is_column_full(&self, column: usize) -> bool {
        !matches!(self.get(0, column), Some(Cell::Empty))
    }

    /// Lowest empty row of a column, or `None` if the column is full.
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        (0..self.height)
            .take_while(|r| self.get(*r, column) == Some(Cell::Empty))
            .last()
    }

    /// Columns covered by a run, left to right, or `None` if the run
    /// would leave the board.
    #[instrument(skip(self))]
    pub fn drop_columns(
        &self,
        size: i64,
        column: i64,
        extension: Extension,
    ) -> Option<Range<usize>> {
        if size < 1 {
            return None;
        }
        let leftmost = leftmost_column(size, column, extension)?;
        match leftmost.checked_add(size) {
            Some(end) if leftmost >= 0 && end <= self.width as i64 => {
                Some(leftmost as usize..end as usize)
            }
            _ => {
                debug!(leftmost, width = self.width, "Run leaves the board");
                None
            }
        }
    }

    /// Drops a run of `size` pieces for `seat`. Each column resolves its
    /// own resting row.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidPosition`] if the run leaves the board or
    /// any covered column is full. The board is untouched in that case.
    #[instrument(skip(self))]
    pub fn drop_run(
        &mut self,
        seat: Seat,
        size: i64,
        column: i64,
        extension: Extension,
    ) -> Result<Vec<Placement>, GameError> {
        let invalid = GameError::InvalidPosition { size, column };
        let columns = self.drop_columns(size, column, extension).ok_or(invalid.clone())?;
        if columns.clone().any(|c| self.is_column_full(c)) {
            debug!(?columns, "Run hits a full column");
            return Err(invalid);
        }

        let mut placements = Vec::with_capacity(columns.len());
        for c in columns {
            let row = self.landing_row(c).ok_or(invalid.clone())?;
            self.cells[row * self.width + c] = Cell::Occupied(seat);
            placements.push(Placement::new(row, c));
        }
        debug!(?placements, "Run dropped");
        Ok(placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4, 7);
        assert_eq!(board.occupied(), 0);
        assert_eq!(board.rows().count(), 4);
        assert!(board.rows().all(|r| r.len() == 7));
        assert_eq!(board.get(4, 0), None);
    }

    #[test]
    fn test_single_piece_lands_on_bottom_then_stacks() {
        let mut board = Board::new(4, 7);
        let first = board.drop_run(Seat::A, 1, 4, Extension::Leftward).unwrap();
        assert_eq!(first, vec![Placement::new(3, 3)]);
        let second = board.drop_run(Seat::B, 1, 4, Extension::Leftward).unwrap();
        assert_eq!(second, vec![Placement::new(2, 3)]);
        assert_eq!(board.get(2, 3), Some(Cell::Occupied(Seat::B)));
    }

    #[test]
    fn test_leftmost_column_rule() {
        assert_eq!(leftmost_column(3, 5, Extension::Rightward), Some(4));
        assert_eq!(leftmost_column(3, 5, Extension::Leftward), Some(2));
        assert_eq!(leftmost_column(1, 5, Extension::Leftward), Some(4));
        assert_eq!(leftmost_column(1, i64::MIN, Extension::Leftward), None);
        assert_eq!(leftmost_column(i64::MIN, 1, Extension::Leftward), None);
    }

    #[test]
    fn test_extreme_columns_leave_the_board() {
        let mut board = Board::new(4, 7);
        for extension in [Extension::Leftward, Extension::Rightward] {
            for column in [i64::MIN, i64::MIN + 1, -1, i64::MAX - 1, i64::MAX] {
                for size in [1, 2, 7, i64::MAX] {
                    assert_eq!(board.drop_columns(size, column, extension), None);
                }
            }
        }
        assert_eq!(board.drop_columns(i64::MIN, 1, Extension::Rightward), None);
        assert_eq!(
            board.drop_run(Seat::A, 2, i64::MAX, Extension::Rightward),
            Err(GameError::InvalidPosition {
                size: 2,
                column: i64::MAX
            })
        );
        assert_eq!(board.occupied(), 0);
    }

    #[test]
    fn test_extension_marker() {
        assert_eq!(Extension::from_marker(Some("D")), Extension::Rightward);
        assert_eq!(Extension::from_marker(Some("E")), Extension::Leftward);
        assert_eq!(Extension::from_marker(Some("d")), Extension::Leftward);
        assert_eq!(Extension::from_marker(None), Extension::Leftward);
    }

    #[test]
    fn test_drop_columns_bounds() {
        let board = Board::new(4, 7);
        assert_eq!(board.drop_columns(3, 1, Extension::Rightward), Some(0..3));
        assert_eq!(board.drop_columns(3, 2, Extension::Leftward), None);
        assert_eq!(board.drop_columns(3, 5, Extension::Rightward), Some(4..7));
        assert_eq!(board.drop_columns(3, 6, Extension::Rightward), None);
        assert_eq!(board.drop_columns(1, 0, Extension::Leftward), None);
        assert_eq!(board.drop_columns(1, 8, Extension::Leftward), None);
    }

    #[test]
    fn test_wide_run_rests_per_column() {
        let mut board = Board::new(4, 7);
        board.drop_run(Seat::B, 1, 2, Extension::Leftward).unwrap();
        board.drop_run(Seat::B, 1, 2, Extension::Leftward).unwrap();

        let placed = board.drop_run(Seat::A, 3, 1, Extension::Rightward).unwrap();
        assert_eq!(
            placed,
            vec![
                Placement::new(3, 0),
                Placement::new(1, 1),
                Placement::new(3, 2)
            ]
        );
    }

    #[test]
    fn test_full_column_rejects_run_without_mutation() {
        let mut board = Board::new(2, 4);
        board.drop_run(Seat::A, 1, 3, Extension::Leftward).unwrap();
        board.drop_run(Seat::A, 1, 3, Extension::Leftward).unwrap();
        let before = board.clone();

        let err = board.drop_run(Seat::B, 2, 2, Extension::Rightward).unwrap_err();
        assert_eq!(err, GameError::InvalidPosition { size: 2, column: 2 });
        assert_eq!(board, before);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(2, 3);
        for _ in 0..2 {
            board.drop_run(Seat::A, 3, 1, Extension::Rightward).unwrap();
        }
        assert!((0..3).all(|c| board.is_column_full(c)));
        assert_eq!(board.landing_row(1), None);
    }

    #[test]
    fn test_cell_codes() {
        for code in 0..3 {
            assert_eq!(Cell::from_code(code).map(Cell::code), Some(code));
        }
        assert_eq!(Cell::from_code(3), None);
    }
}
