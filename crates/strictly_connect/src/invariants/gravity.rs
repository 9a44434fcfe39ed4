//! Gravity invariant: no piece rests above an empty cell.

use super::Invariant;
use crate::{Board, Cell, Match};

/// Invariant: every column's pieces form one block ending at the bottom row.
pub struct GravityInvariant;

impl GravityInvariant {
    /// Checks the property directly on a board.
    pub fn holds_for(board: &Board) -> bool {
        (0..board.width()).all(|column| {
            (0..board.height().saturating_sub(1)).all(|row| {
                board.get(row, column) == Some(Cell::Empty)
                    || board.get(row + 1, column) != Some(Cell::Empty)
            })
        })
    }
}

impl Invariant<Match> for GravityInvariant {
    fn holds(game: &Match) -> bool {
        Self::holds_for(game.board())
    }

    fn description() -> &'static str {
        "Pieces rest on the bottom row or on another piece"
    }
}
