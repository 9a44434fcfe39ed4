//! Properties every live match satisfies.
//!
//! `Match::drop_piece` asserts them in debug builds; the codec checks
//! them unconditionally before accepting a saved match.

use derive_more::Display;

/// A property of `S` with a fixed description.
pub trait Invariant<S> {
    /// True when `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// One-line statement of the property, used in violation reports.
    fn description() -> &'static str;
}

/// A property that failed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Statement of the failed property.
    pub description: String,
}

impl InvariantViolation {
    /// Wraps a failed property's description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Several invariants over the same state, checked in one pass.
pub trait InvariantSet<S> {
    /// Every violated invariant, in declaration order.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, G, B> InvariantSet<S> for (G, B)
where
    G: Invariant<S>,
    B: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<InvariantViolation> = [
            (G::holds(state), G::description()),
            (B::holds(state), B::description()),
        ]
        .into_iter()
        .filter(|(held, _)| !held)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod gravity;
pub mod inventory_bound;

pub use gravity::GravityInvariant;
pub use inventory_bound::InventoryBoundInvariant;

/// Board gravity plus inventory bounds.
pub type MatchInvariants = (GravityInvariant, InventoryBoundInvariant);
