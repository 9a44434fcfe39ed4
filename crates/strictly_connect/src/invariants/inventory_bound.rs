//! Inventory bound invariant: special sizes stay below the winning length.

use super::Invariant;
use crate::Match;

/// Invariant: declared sizes and both inventories hold only sizes in
/// `1..sequence_size`.
pub struct InventoryBoundInvariant;

impl Invariant<Match> for InventoryBoundInvariant {
    fn holds(game: &Match) -> bool {
        let limit = *game.sequence_size();
        let in_bounds = |sizes: &[usize]| sizes.iter().all(|s| (1..limit).contains(s));
        in_bounds(game.declared().sizes())
            && game
                .seats()
                .iter()
                .all(|seat| in_bounds(seat.inventory().sizes()))
    }

    fn description() -> &'static str {
        "Special sequence sizes are positive and below the sequence size"
    }
}
