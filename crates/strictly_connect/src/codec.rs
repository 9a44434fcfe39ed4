//! Plain-text save format for the ledger and the active match.
//!
//! ```text
//! <player_count>
//! <name> <games_played> <wins>            one line per player
//! <height> <width> <sequence_size>        only while a match is active
//! <declared_count> <size>...
//! <seat_a_name> <size>...
//! <seat_b_name> <size>...
//! <cell>...                               height rows of width cells
//! ```
//!
//! Cells are `0` (empty), `1` (seat A) or `2` (seat B). Counts precede
//! variable-length fields and every record's field count is checked.

use std::path::Path;
use std::str::FromStr;

use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::game::SeatedPlayer;
use crate::invariants::{InvariantSet, MatchInvariants};
use crate::rules::{validate_geometry, validate_special_sequences};
use crate::{Board, Cell, CodecError, GameEngine, Match, Player, PlayerLedger, Seat, SpecialSequences};

/// Renders the whole engine state.
#[instrument(skip(engine))]
pub fn encode(engine: &GameEngine) -> String {
    let mut lines = Vec::new();
    lines.push(engine.ledger.len().to_string());
    for player in engine.ledger.iter() {
        lines.push(format!(
            "{} {} {}",
            player.name(),
            player.games_played(),
            player.wins()
        ));
    }

    if let Some(active) = &engine.active {
        lines.push(format!(
            "{} {} {}",
            active.height, active.width, active.sequence_size
        ));
        lines.push(join_record(
            active.declared.len().to_string(),
            active.declared.sizes(),
        ));
        for seat in Seat::iter() {
            let seated = active.seated(seat);
            lines.push(join_record(seated.name.clone(), seated.inventory.sizes()));
        }
        for row in active.board.rows() {
            let cells: Vec<String> = row.iter().map(|c| c.code().to_string()).collect();
            lines.push(cells.join(" "));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    debug!(bytes = text.len(), "State encoded");
    text
}

fn join_record(head: String, sizes: &[usize]) -> String {
    std::iter::once(head)
        .chain(sizes.iter().map(|s| s.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One non-blank line of the save file.
struct Record<'a> {
    /// 1-based line number in the file.
    number: usize,
    fields: Vec<&'a str>,
}

impl Record<'_> {
    fn expect_fields(&self, count: usize, what: &str) -> Result<(), CodecError> {
        if self.fields.len() != count {
            return Err(CodecError::new(format!(
                "line {}: {} expects {} fields, found {}",
                self.number,
                what,
                count,
                self.fields.len()
            )));
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, idx: usize, what: &str) -> Result<T, CodecError> {
        let raw = self.fields.get(idx).ok_or_else(|| {
            CodecError::new(format!("line {}: missing {}", self.number, what))
        })?;
        raw.parse().map_err(|_| {
            CodecError::new(format!("line {}: invalid {} '{}'", self.number, what, raw))
        })
    }

    fn parse_rest<T: FromStr>(&self, from: usize, what: &str) -> Result<Vec<T>, CodecError> {
        (from..self.fields.len())
            .map(|idx| self.parse(idx, what))
            .collect()
    }
}

struct Records<'a> {
    inner: Box<dyn Iterator<Item = Record<'a>> + 'a>,
}

impl<'a> Records<'a> {
    fn new(text: &'a str) -> Self {
        let inner = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| Record {
                number: idx + 1,
                fields: line.split_whitespace().collect(),
            });
        Self {
            inner: Box::new(inner),
        }
    }

    fn next_optional(&mut self) -> Option<Record<'a>> {
        self.inner.next()
    }

    fn next_required(&mut self, what: &str) -> Result<Record<'a>, CodecError> {
        self.inner
            .next()
            .ok_or_else(|| CodecError::new(format!("unexpected end of file, expected {}", what)))
    }

    fn finish(mut self) -> Result<(), CodecError> {
        match self.inner.next() {
            Some(extra) => Err(CodecError::new(format!(
                "line {}: unexpected trailing record",
                extra.number
            ))),
            None => Ok(()),
        }
    }
}

/// Parses a saved state into a fresh engine.
///
/// # Errors
///
/// Returns [`CodecError`] naming the offending line for truncated files,
/// wrong field counts, unparsable numbers, unknown seated players, or a
/// match that breaks the board or inventory invariants.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn decode(text: &str) -> Result<GameEngine, CodecError> {
    let mut records = Records::new(text);

    let header = records.next_required("player count")?;
    header.expect_fields(1, "player count")?;
    let count: usize = header.parse(0, "player count")?;

    let mut ledger = PlayerLedger::new();
    for _ in 0..count {
        let record = records.next_required("player record")?;
        record.expect_fields(3, "player record")?;
        let player = Player::with_stats(
            record.fields[0].to_string(),
            record.parse(1, "games played")?,
            record.parse(2, "wins")?,
        );
        ledger
            .insert(player)
            .map_err(|e| CodecError::new(format!("line {}: {}", record.number, e)))?;
    }

    let active = match records.next_optional() {
        None => None,
        Some(geometry) => decode_match(geometry, &mut records, &ledger)?,
    };
    records.finish()?;

    info!(
        players = ledger.len(),
        in_match = active.is_some(),
        "State decoded"
    );
    Ok(GameEngine { ledger, active })
}

fn decode_match<'a>(
    geometry: Record<'a>,
    records: &mut Records<'a>,
    ledger: &PlayerLedger,
) -> Result<Option<Match>, CodecError> {
    geometry.expect_fields(3, "match header")?;
    let height: i64 = geometry.parse(0, "height")?;
    let width: i64 = geometry.parse(1, "width")?;
    let sequence_size: i64 = geometry.parse(2, "sequence size")?;
    if height == 0 {
        debug!("Match header with zero height, no active match");
        return Ok(None);
    }
    validate_geometry(width, height, sequence_size)
        .map_err(|e| CodecError::new(format!("line {}: {}", geometry.number, e)))?;

    let declared_record = records.next_required("special sequences")?;
    let declared_count: usize = declared_record.parse(0, "special sequence count")?;
    declared_record.expect_fields(declared_count.saturating_add(1), "special sequences")?;
    let declared: Vec<i64> = declared_record.parse_rest(1, "special sequence")?;
    validate_special_sequences(sequence_size, &declared)
        .map_err(|e| CodecError::new(format!("line {}: {}", declared_record.number, e)))?;
    let declared: SpecialSequences = declared.into_iter().map(|s| s as usize).collect();

    let seat_a = decode_seat(records.next_required("seat A")?, ledger)?;
    let seat_b = decode_seat(records.next_required("seat B")?, ledger)?;

    let (height, width) = (height as usize, width as usize);
    let mut board = Board::new(height, width);
    for row in 0..height {
        let record = records.next_required("board row")?;
        record.expect_fields(width, "board row")?;
        for column in 0..width {
            let code: u8 = record.parse(column, "cell")?;
            let cell = Cell::from_code(code).ok_or_else(|| {
                CodecError::new(format!("line {}: invalid cell '{}'", record.number, code))
            })?;
            board
                .set(row, column, cell)
                .map_err(|e| CodecError::new(format!("line {}: {}", record.number, e)))?;
        }
    }

    let restored = Match::restore(sequence_size as usize, declared, [seat_a, seat_b], board);
    MatchInvariants::check_all(&restored).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        CodecError::new(format!("saved match is inconsistent: {}", descriptions))
    })?;
    Ok(Some(restored))
}

fn decode_seat(record: Record<'_>, ledger: &PlayerLedger) -> Result<SeatedPlayer, CodecError> {
    let name = record.fields.first().ok_or_else(|| {
        CodecError::new(format!("line {}: missing seated player", record.number))
    })?;
    if !ledger.contains(name) {
        return Err(CodecError::new(format!(
            "line {}: seated player '{}' is not registered",
            record.number, name
        )));
    }
    let sizes: Vec<usize> = record.parse_rest(1, "special sequence")?;
    Ok(SeatedPlayer::new(name, SpecialSequences::new(sizes)))
}

/// Writes `engine` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`CodecError`] if the file cannot be written.
#[instrument(skip(engine))]
pub fn save(engine: &GameEngine, path: &Path) -> Result<(), CodecError> {
    std::fs::write(path, encode(engine)).map_err(|e| {
        warn!(error = %e, "Save failed");
        CodecError::new(format!("cannot write '{}': {}", path.display(), e))
    })?;
    info!("State saved");
    Ok(())
}

/// Reads a fresh engine from `path`.
///
/// # Errors
///
/// Returns [`CodecError`] if the file cannot be read or is malformed.
#[instrument]
pub fn load(path: &Path) -> Result<GameEngine, CodecError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        warn!(error = %e, "Load failed");
        CodecError::new(format!("cannot read '{}': {}", path.display(), e))
    })?;
    decode(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Extension, MoveRequest, StartRequest};

    fn mid_match() -> GameEngine {
        let mut engine = GameEngine::new();
        for name in ["rui", "ana", "eva"] {
            engine.register(name).unwrap();
        }
        engine
            .start(StartRequest::new(
                "ana".into(),
                "rui".into(),
                5,
                3,
                4,
                vec![2, 3, 2],
            ))
            .unwrap();
        engine
            .make_move(&MoveRequest::new("ana".into(), 2, 1, Extension::Rightward))
            .unwrap();
        engine
            .make_move(&MoveRequest::new("rui".into(), 1, 2, Extension::Leftward))
            .unwrap();
        engine
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&mid_match());
        let expected = "3\n\
                        rui 0 0\n\
                        ana 0 0\n\
                        eva 0 0\n\
                        3 5 4\n\
                        3 2 3 2\n\
                        ana 3 2\n\
                        rui 2 3 2\n\
                        0 0 0 0 0\n\
                        0 2 0 0 0\n\
                        1 1 0 0 0\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_encode_without_match() {
        let mut engine = GameEngine::new();
        engine.register("ana").unwrap();
        assert_eq!(encode(&engine), "1\nana 0 0\n");
        assert_eq!(encode(&GameEngine::new()), "0\n");
    }

    #[test]
    fn test_decode_restores_mid_match() {
        let engine = mid_match();
        let restored = decode(&encode(&engine)).unwrap();
        assert_eq!(restored, engine);
    }

    #[test]
    fn test_decode_accepts_zero_height_header() {
        let engine = decode("1\nana 3 1\n0 0 0\n").unwrap();
        assert!(!engine.in_match());
        assert_eq!(*engine.ledger().get("ana").unwrap().wins(), 1);
    }

    #[test]
    fn test_decode_accepts_trailing_spaces_and_blank_lines() {
        let text = "2\nana 1 0 \nrui 1 1\n2 3 2\n1 1 \nana 1 \nrui \n0 0 0\n2 1 0\n\n";
        let engine = decode(text).unwrap();
        let active = engine.active_match().unwrap();
        assert_eq!(active.declared().sizes(), &[1]);
        assert_eq!(active.seated(Seat::A).inventory().sizes(), &[1]);
        assert!(active.seated(Seat::B).inventory().is_empty());
        assert_eq!(active.board().get(1, 0), Some(Cell::Occupied(Seat::B)));
    }

    #[test]
    fn test_decode_rejects_truncated_board() {
        let mut text = encode(&mid_match());
        text.truncate(text.trim_end().rfind('\n').unwrap());
        let err = decode(&text).unwrap_err();
        assert!(err.message.contains("board row"), "{}", err.message);
    }

    #[test]
    fn test_decode_rejects_wrong_declared_count() {
        let err = decode("1\nana 0 0\n3 5 4\n2 2\nana\nana\n").unwrap_err();
        assert!(err.message.contains("line 4"), "{}", err.message);
    }

    #[test]
    fn test_decode_rejects_unknown_seat() {
        let err = decode("1\nana 0 0\n3 5 4\n0\nana\nzé\n").unwrap_err();
        assert!(err.message.contains("not registered"), "{}", err.message);
    }

    #[test]
    fn test_decode_rejects_floating_piece() {
        let text = "2\nana 0 0\nrui 0 0\n2 3 2\n0\nana\nrui\n1 0 0\n0 0 0\n";
        let err = decode(text).unwrap_err();
        assert!(err.message.contains("inconsistent"), "{}", err.message);
    }

    #[test]
    fn test_decode_rejects_bad_cell_code() {
        let text = "2\nana 0 0\nrui 0 0\n2 3 2\n0\nana\nrui\n0 0 0\n0 3 0\n";
        assert!(decode(text).is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_records() {
        let err = decode("1\nana 0 0\n0 0 0\nextra\n").unwrap_err();
        assert!(err.message.contains("trailing"), "{}", err.message);
    }

    #[test]
    fn test_decode_rejects_negative_stats() {
        assert!(decode("1\nana -1 0\n").is_err());
    }

    #[test]
    fn test_decode_rejects_oversized_header() {
        let text = "2\nana 0 0\nrui 0 0\n100000000000 2 1\n0\nana\nrui\n0 0\n";
        let err = decode(text).unwrap_err();
        assert!(err.message.contains("line 4"), "{}", err.message);

        let text = "2\nana 0 0\nrui 0 0\n8589934592 4294967296 3\n0\nana\nrui\n";
        assert!(decode(text).is_err());
    }
}
