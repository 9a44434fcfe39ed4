//! Strictly Connect - a gravity-drop connection game engine
//!
//! Two seated players drop pieces into the columns of a rectangular
//! board. Besides single pieces, each seat holds a finite inventory of
//! wide "special sequences" that cover several adjacent columns in one
//! move, each column falling independently. The first player to line up
//! `sequence_size` pieces horizontally, vertically or diagonally wins.
//!
//! # Architecture
//!
//! - **Ledger**: registered players with games-played and win counters
//! - **Match**: geometry, seats, inventories and the board
//! - **Rules**: setup validation, placement checks and win detection
//! - **Invariants**: properties every live match satisfies
//! - **Codec**: the plain-text save format
//!
//! # Example
//!
//! ```
//! use strictly_connect::{Extension, GameEngine, MoveRequest, StartRequest};
//!
//! # fn example() -> Result<(), strictly_connect::GameError> {
//! let mut engine = GameEngine::new();
//! engine.register("ana")?;
//! engine.register("rui")?;
//! engine.start(StartRequest::new("ana".into(), "rui".into(), 7, 4, 4, vec![2]))?;
//! let outcome = engine.make_move(&MoveRequest::new("ana".into(), 2, 3, Extension::Rightward))?;
//! assert_eq!(outcome.placements().len(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod engine;
mod error;
mod game;
mod inventory;
mod ledger;

// Public modules
pub mod codec;
pub mod invariants;
pub mod rules;

// Crate-level exports - Board primitives
pub use board::{Board, Cell, Extension, Placement, Seat, leftmost_column};

// Crate-level exports - Inventories and players
pub use inventory::SpecialSequences;
pub use ledger::{Player, PlayerLedger};

// Crate-level exports - Match state
pub use game::{Match, MatchDescription, SeatSummary, SeatedPlayer};

// Crate-level exports - Requests and outcomes
pub use action::{CellView, MoveOutcome, MoveRequest, StartRequest};

// Crate-level exports - Engine
pub use engine::GameEngine;

// Crate-level exports - Errors
pub use error::{CodecError, ErrorKind, GameError};
