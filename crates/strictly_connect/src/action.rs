//! First-class request types for engine operations.
//!
//! Requests carry raw protocol values (signed, 1-indexed) so that every
//! range check happens inside the engine, before any mutation.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{Extension, Placement};

/// Request to start a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct StartRequest {
    /// Player taking seat A.
    pub player_a: String,
    /// Player taking seat B.
    pub player_b: String,
    /// Board width.
    pub width: i64,
    /// Board height.
    pub height: i64,
    /// Winning run length.
    pub sequence_size: i64,
    /// Special sizes given to each seat.
    pub special_sequences: Vec<i64>,
}

/// A move: a player dropping a piece of some size at a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveRequest {
    /// Name of the moving player.
    pub player: String,
    /// Number of contiguous columns covered.
    pub size: i64,
    /// Target column, 1-indexed.
    pub column: i64,
    /// How the run extends from the target column.
    pub extension: Extension,
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} drops {} at column {} ({:?})",
            self.player, self.size, self.column, self.extension
        )
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Pieces placed; the match continues.
    Placed(Vec<Placement>),
    /// The move completed a run. The match is over and the ledger updated.
    Won {
        /// Name of the winner.
        winner: String,
        /// Cells filled by the winning move.
        placements: Vec<Placement>,
    },
}

impl MoveOutcome {
    /// Returns true if the move ended the match.
    pub fn is_win(&self) -> bool {
        matches!(self, MoveOutcome::Won { .. })
    }

    /// Cells filled by the move.
    pub fn placements(&self) -> &[Placement] {
        match self {
            MoveOutcome::Placed(placements) => placements,
            MoveOutcome::Won { placements, .. } => placements,
        }
    }
}

/// One cell of a board dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct CellView {
    /// Row, 1-indexed from the top.
    pub row: usize,
    /// Column, 1-indexed from the left.
    pub column: usize,
    /// Owner name, or `None` if empty.
    pub owner: Option<String>,
}
