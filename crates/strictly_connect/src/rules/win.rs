//! Win detection: a run of `sequence_size` same-seat cells along any axis.

use tracing::{debug, instrument};

use crate::{Board, Cell, Seat};

/// Axis shifts as `(row, column)`: horizontal, vertical, both diagonals.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Counts `seat` cells from the origin along `(dr, dc)`, origin excluded.
fn count_from(board: &Board, seat: Seat, row: usize, column: usize, dr: isize, dc: isize) -> usize {
    let mut count = 0;
    let mut r = row as isize + dr;
    let mut c = column as isize + dc;
    while r >= 0 && c >= 0 {
        match board.get(r as usize, c as usize) {
            Some(Cell::Occupied(owner)) if owner == seat => count += 1,
            _ => break,
        }
        r += dr;
        c += dc;
    }
    count
}

/// Length of the `seat` run through `(row, column)` along `axis`,
/// counting the origin cell once.
pub fn run_length(board: &Board, seat: Seat, row: usize, column: usize, axis: (isize, isize)) -> usize {
    let (dr, dc) = axis;
    count_from(board, seat, row, column, dr, dc) + 1 + count_from(board, seat, row, column, -dr, -dc)
}

/// Checks if the piece at `(row, column)` completes a run of at least
/// `sequence_size` for `seat`.
#[instrument(skip(board))]
pub fn player_wins(board: &Board, seat: Seat, row: usize, column: usize, sequence_size: usize) -> bool {
    if board.get(row, column) != Some(Cell::Occupied(seat)) {
        return false;
    }
    let winning = AXES
        .iter()
        .find(|axis| run_length(board, seat, row, column, **axis) >= sequence_size);
    if let Some(axis) = winning {
        debug!(?axis, "Winning run found");
    }
    winning.is_some()
}
