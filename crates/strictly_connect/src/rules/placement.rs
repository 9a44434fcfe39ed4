//! Move preconditions: piece size and drop position.

use tracing::{debug, instrument};

use crate::{Board, Extension, SpecialSequences};

/// Size 1 is always playable and never consumes inventory. Larger sizes
/// need a matching inventory entry; non-positive sizes never play.
#[instrument(skip(inventory))]
pub fn valid_size(inventory: &SpecialSequences, size: i64) -> bool {
    let valid = match size {
        1 => true,
        s if s <= 0 => false,
        s => inventory.contains(s as usize),
    };
    debug!(valid, "Size checked");
    valid
}

/// A run is placeable when it fits inside the board and none of its
/// columns has a piece in the top row.
#[instrument(skip(board))]
pub fn valid_position(board: &Board, size: i64, column: i64, extension: Extension) -> bool {
    match board.drop_columns(size, column, extension) {
        Some(mut columns) => columns.all(|c| !board.is_column_full(c)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Seat;

    #[test]
    fn test_default_size_always_valid() {
        assert!(valid_size(&SpecialSequences::default(), 1));
    }

    #[test]
    fn test_non_positive_sizes_invalid() {
        let inv = SpecialSequences::new(vec![2]);
        assert!(!valid_size(&inv, 0));
        assert!(!valid_size(&inv, -2));
    }

    #[test]
    fn test_special_size_needs_inventory() {
        let inv = SpecialSequences::new(vec![2, 3]);
        assert!(valid_size(&inv, 3));
        assert!(!valid_size(&inv, 4));
    }

    #[test]
    fn test_position_rejected_on_full_top_row() {
        let mut board = Board::new(1, 5);
        board.drop_run(Seat::A, 1, 3, Extension::Leftward).unwrap();
        assert!(!valid_position(&board, 2, 3, Extension::Rightward));
        assert!(!valid_position(&board, 2, 4, Extension::Leftward));
        assert!(valid_position(&board, 2, 4, Extension::Rightward));
        assert!(valid_position(&board, 2, 2, Extension::Leftward));
    }

    #[test]
    fn test_position_rejected_off_board() {
        let board = Board::new(3, 5);
        assert!(!valid_position(&board, 3, 2, Extension::Leftward));
        assert!(!valid_position(&board, 2, 5, Extension::Rightward));
        assert!(valid_position(&board, 5, 1, Extension::Rightward));
    }
}
