//! The active match: geometry, seats with their inventories, and the board.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::invariants::{InvariantSet, MatchInvariants};
use crate::rules::{player_wins, valid_position, valid_size};
use crate::{Board, Cell, Extension, GameError, Placement, Seat, SpecialSequences};

/// A registered player occupying a seat, with the wide pieces they have left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SeatedPlayer {
    /// Ledger name of the player.
    pub(crate) name: String,
    /// Remaining special sequences.
    pub(crate) inventory: SpecialSequences,
}

impl SeatedPlayer {
    pub(crate) fn new(name: &str, inventory: SpecialSequences) -> Self {
        Self {
            name: name.to_string(),
            inventory,
        }
    }
}

/// A single match between two seated players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Match {
    pub(crate) width: usize,
    pub(crate) height: usize,
    /// Winning run length.
    pub(crate) sequence_size: usize,
    /// Special sizes declared at start; both seats began with this multiset.
    pub(crate) declared: SpecialSequences,
    /// Seat A then seat B.
    pub(crate) seats: [SeatedPlayer; 2],
    pub(crate) board: Board,
}

/// Remaining inventory of one seat, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SeatSummary {
    name: String,
    /// `(size, remaining)` over the distinct declared sizes.
    histogram: Vec<(usize, usize)>,
}

/// Snapshot of a match's dimensions and both seats' inventories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchDescription {
    width: usize,
    height: usize,
    seats: [SeatSummary; 2],
}

impl Match {
    /// Creates a match on an empty board. Both seats receive a copy of
    /// `declared`. Geometry is assumed to be validated by the caller.
    #[instrument(skip(declared))]
    pub fn new(
        player_a: &str,
        player_b: &str,
        width: usize,
        height: usize,
        sequence_size: usize,
        declared: SpecialSequences,
    ) -> Self {
        Self {
            width,
            height,
            sequence_size,
            seats: [
                SeatedPlayer::new(player_a, declared.clone()),
                SeatedPlayer::new(player_b, declared.clone()),
            ],
            declared,
            board: Board::new(height, width),
        }
    }

    /// Reassembles a match from saved parts.
    pub(crate) fn restore(
        sequence_size: usize,
        declared: SpecialSequences,
        seats: [SeatedPlayer; 2],
        board: Board,
    ) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            sequence_size,
            declared,
            seats,
            board,
        }
    }

    /// Seat held by `name`. Seat A is checked first.
    pub fn seat_of(&self, name: &str) -> Option<Seat> {
        if self.seats[Seat::A.index()].name == name {
            Some(Seat::A)
        } else if self.seats[Seat::B.index()].name == name {
            Some(Seat::B)
        } else {
            None
        }
    }

    /// The player in a seat.
    pub fn seated(&self, seat: Seat) -> &SeatedPlayer {
        &self.seats[seat.index()]
    }

    /// Name of the owner of a cell, or `None` if it is empty.
    pub fn owner_name(&self, cell: Cell) -> Option<&str> {
        cell.seat().map(|seat| self.seated(seat).name.as_str())
    }

    /// Validates and drops a run for `seat`, consuming one special
    /// sequence when `size > 1`.
    ///
    /// # Errors
    ///
    /// - [`GameError::SizeUnavailable`] if the seat cannot play this size.
    /// - [`GameError::InvalidPosition`] if the run does not fit.
    ///
    /// Neither the board nor the inventory changes on error.
    #[instrument(skip(self), fields(player = %self.seated(seat).name))]
    pub fn drop_piece(
        &mut self,
        seat: Seat,
        size: i64,
        column: i64,
        extension: Extension,
    ) -> Result<Vec<Placement>, GameError> {
        if !valid_size(&self.seats[seat.index()].inventory, size) {
            warn!("Piece size not available");
            return Err(GameError::SizeUnavailable(size));
        }
        if !valid_position(&self.board, size, column, extension) {
            warn!("Irregular position");
            return Err(GameError::InvalidPosition { size, column });
        }

        let placements = self.board.drop_run(seat, size, column, extension)?;
        if size > 1 {
            self.seats[seat.index()].inventory.take(size as usize);
        }

        debug_assert!(
            MatchInvariants::check_all(self).is_ok(),
            "Match invariants violated"
        );

        info!(?placements, "Piece placed");
        Ok(placements)
    }

    /// First placement, in order, that completes a winning run for `seat`.
    #[instrument(skip(self, placements))]
    pub fn winning_placement(&self, seat: Seat, placements: &[Placement]) -> Option<Placement> {
        let winner = placements
            .iter()
            .copied()
            .find(|p| player_wins(&self.board, seat, p.row, p.column, self.sequence_size));
        debug!(?winner, "Win check complete");
        winner
    }

    /// Dimensions and per-seat inventory histograms over the declared sizes.
    pub fn describe(&self) -> MatchDescription {
        let summary = |seat: &SeatedPlayer| SeatSummary {
            name: seat.name.clone(),
            histogram: seat.inventory.histogram(&self.declared),
        };
        MatchDescription {
            width: self.width,
            height: self.height,
            seats: [summary(&self.seats[0]), summary(&self.seats[1])],
        }
    }
}
