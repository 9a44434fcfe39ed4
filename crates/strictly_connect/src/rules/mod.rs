//! Game rules for connect-style matches.
//!
//! Pure functions over the board and inventories. They are separated from
//! storage so the match and the engine can compose them into validation.

pub mod placement;
pub mod setup;
pub mod win;

pub use placement::{valid_position, valid_size};
pub use setup::{MAX_CELLS, validate_geometry, validate_special_sequences};
pub use win::{AXES, player_wins, run_length};
