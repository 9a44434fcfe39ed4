//! Match setup rules: board geometry and declared special sequences.

use tracing::{debug, instrument};

use crate::GameError;

/// Largest board accepted, in cells.
pub const MAX_CELLS: i64 = 1 << 20;

/// Checks width, height and winning length.
///
/// Height must be at least half the width (integer division), the board
/// may hold at most [`MAX_CELLS`] cells, and the winning length must
/// satisfy `1 <= sequence_size < width`.
///
/// # Errors
///
/// [`GameError::InvalidDimensions`] or [`GameError::InvalidSequenceSize`].
#[instrument]
pub fn validate_geometry(width: i64, height: i64, sequence_size: i64) -> Result<(), GameError> {
    let cells = height.checked_mul(width).unwrap_or(i64::MAX);
    if width < 1 || height < 1 || height < width / 2 || cells > MAX_CELLS {
        debug!(cells, "Dimensions rejected");
        return Err(GameError::InvalidDimensions { width, height });
    }
    if sequence_size < 1 || sequence_size >= width {
        debug!("Sequence size rejected");
        return Err(GameError::InvalidSequenceSize {
            width,
            sequence_size,
        });
    }
    Ok(())
}

/// Checks that every declared size lies in `1..sequence_size`.
///
/// # Errors
///
/// [`GameError::InvalidSpecialSequence`] naming the first offending size.
#[instrument]
pub fn validate_special_sequences(sequence_size: i64, sizes: &[i64]) -> Result<(), GameError> {
    match sizes.iter().find(|s| **s < 1 || **s >= sequence_size) {
        Some(size) => {
            debug!(size, "Special sequence rejected");
            Err(GameError::InvalidSpecialSequence {
                size: *size,
                sequence_size,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_boundary() {
        assert!(validate_geometry(9, 4, 4).is_ok());
        assert_eq!(
            validate_geometry(9, 3, 4),
            Err(GameError::InvalidDimensions {
                width: 9,
                height: 3
            })
        );
        assert!(validate_geometry(7, 3, 4).is_ok());
    }

    #[test]
    fn test_sequence_must_be_below_width() {
        assert!(validate_geometry(7, 4, 6).is_ok());
        assert!(matches!(
            validate_geometry(7, 4, 7),
            Err(GameError::InvalidSequenceSize { .. })
        ));
        assert!(matches!(
            validate_geometry(7, 4, 0),
            Err(GameError::InvalidSequenceSize { .. })
        ));
    }

    #[test]
    fn test_non_positive_dimensions() {
        assert!(validate_geometry(0, 0, 0).is_err());
        assert!(validate_geometry(4, -1, 2).is_err());
    }

    #[test]
    fn test_board_size_upper_bound() {
        assert!(validate_geometry(1024, 1024, 4).is_ok());
        assert!(matches!(
            validate_geometry(1024, 1025, 4),
            Err(GameError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            validate_geometry(4_294_967_296, 8_589_934_592, 3),
            Err(GameError::InvalidDimensions { .. })
        ));
        assert!(validate_geometry(2, 100_000_000_000, 1).is_err());
        assert!(validate_geometry(i64::MAX, i64::MAX, 3).is_err());
    }

    #[test]
    fn test_special_sequence_bound() {
        assert!(validate_special_sequences(4, &[3, 2, 3]).is_ok());
        assert!(validate_special_sequences(4, &[]).is_ok());
        assert_eq!(
            validate_special_sequences(4, &[2, 4]),
            Err(GameError::InvalidSpecialSequence {
                size: 4,
                sequence_size: 4
            })
        );
        assert!(validate_special_sequences(4, &[0]).is_err());
    }
}
