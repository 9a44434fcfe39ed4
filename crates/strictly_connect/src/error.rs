//! Error types for engine operations and the save-file codec.

use derive_more::{Display, Error};
use tracing::instrument;

/// Broad classification of a failure, used by callers that only care
/// about what went wrong at a high level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Bad dimensions, sequence size, piece size or position.
    Validation,
    /// Unknown or unseated player name.
    Lookup,
    /// Operation not allowed in the current lifecycle state.
    State,
    /// File access or save-file format failure.
    Io,
}

/// Error returned by engine operations.
///
/// Every variant is produced before any mutation happens, so the engine
/// state is unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// A player with this name is already registered.
    #[display("Player '{}' already exists", _0)]
    PlayerExists(String),

    /// Names must be non-empty and free of whitespace.
    #[display("Invalid player name '{}'", _0)]
    InvalidName(String),

    /// No player with this name is registered.
    #[display("Player '{}' is not registered", _0)]
    UnknownPlayer(String),

    /// The player sits in the active match and cannot be removed.
    #[display("Player '{}' is seated in the active match", _0)]
    PlayerSeated(String),

    /// A match is already in progress.
    #[display("A match is already active")]
    MatchAlreadyActive,

    /// No match is in progress.
    #[display("No match is active")]
    NoMatch,

    /// The player is not one of the two seated players.
    #[display("Player '{}' is not seated in the active match", _0)]
    PlayerNotSeated(String),

    /// Board dimensions rejected (height must be at least width / 2).
    #[display("Invalid board dimensions {}x{}", width, height)]
    InvalidDimensions {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
    },

    /// Winning sequence size must satisfy 1 <= size < width.
    #[display("Invalid sequence size {} for width {}", sequence_size, width)]
    InvalidSequenceSize {
        /// Board width.
        width: i64,
        /// Requested sequence size.
        sequence_size: i64,
    },

    /// A declared special sequence is not strictly below the sequence size.
    #[display("Invalid special sequence {} (sequence size {})", size, sequence_size)]
    InvalidSpecialSequence {
        /// Offending special size.
        size: i64,
        /// Match sequence size.
        sequence_size: i64,
    },

    /// The mover has no remaining piece of this size.
    #[display("Piece size {} is not available", _0)]
    SizeUnavailable(i64),

    /// The run does not fit on the board or hits a full column.
    #[display("Irregular position for size {} at column {}", size, column)]
    InvalidPosition {
        /// Piece size.
        size: i64,
        /// Target column (1-indexed).
        column: i64,
    },
}

impl GameError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName(_)
            | Self::InvalidDimensions { .. }
            | Self::InvalidSequenceSize { .. }
            | Self::InvalidSpecialSequence { .. }
            | Self::SizeUnavailable(_)
            | Self::InvalidPosition { .. } => ErrorKind::Validation,
            Self::UnknownPlayer(_) | Self::PlayerNotSeated(_) => ErrorKind::Lookup,
            Self::PlayerExists(_)
            | Self::PlayerSeated(_)
            | Self::MatchAlreadyActive
            | Self::NoMatch => ErrorKind::State,
        }
    }
}

impl std::error::Error for GameError {}

/// Save-file error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Codec error: {} at {}:{}", message, file, line)]
pub struct CodecError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CodecError {
    /// Creates a new codec error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Codec failures always belong to the I/O category.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Io
    }
}

impl From<std::io::Error> for CodecError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}
