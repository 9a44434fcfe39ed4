//! Process-wide game state: the player ledger plus at most one active match.

use std::path::Path;

use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::rules::{validate_geometry, validate_special_sequences};
use crate::{
    CellView, CodecError, GameError, Match, MatchDescription, MoveOutcome, MoveRequest, Player,
    PlayerLedger, Seat, SpecialSequences, StartRequest, codec,
};

/// Owns the ledger and the optional active match.
///
/// Every operation validates completely before mutating, so an `Err`
/// leaves the engine exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameEngine {
    pub(crate) ledger: PlayerLedger,
    pub(crate) active: Option<Match>,
}

impl GameEngine {
    /// Creates an engine with no players and no match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the player ledger.
    pub fn ledger(&self) -> &PlayerLedger {
        &self.ledger
    }

    /// Returns the active match, if any.
    pub fn active_match(&self) -> Option<&Match> {
        self.active.as_ref()
    }

    /// Checks if a match is in progress.
    pub fn in_match(&self) -> bool {
        self.active.is_some()
    }

    /// Registers a new player.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidName`] for an empty name or one holding
    /// whitespace, [`GameError::PlayerExists`] if the name is taken.
    #[instrument(skip(self))]
    pub fn register(&mut self, name: &str) -> Result<(), GameError> {
        self.ledger.register(name).map(|_| ())
    }

    /// Removes a player who is not seated in the active match.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownPlayer`] or [`GameError::PlayerSeated`].
    #[instrument(skip(self))]
    pub fn unregister(&mut self, name: &str) -> Result<Player, GameError> {
        if !self.ledger.contains(name) {
            return Err(GameError::UnknownPlayer(name.to_string()));
        }
        if self.active.as_ref().and_then(|m| m.seat_of(name)).is_some() {
            warn!(name, "Cannot remove seated player");
            return Err(GameError::PlayerSeated(name.to_string()));
        }
        self.ledger.remove(name)
    }

    /// Registered players sorted by name.
    pub fn list(&self) -> Vec<&Player> {
        self.ledger.sorted()
    }

    /// Starts a match between two registered players.
    ///
    /// # Errors
    ///
    /// Checked in this order: [`GameError::MatchAlreadyActive`],
    /// [`GameError::UnknownPlayer`], [`GameError::InvalidDimensions`],
    /// [`GameError::InvalidSequenceSize`], [`GameError::InvalidSpecialSequence`].
    #[instrument(skip(self))]
    pub fn start(&mut self, request: StartRequest) -> Result<&Match, GameError> {
        if self.active.is_some() {
            return Err(GameError::MatchAlreadyActive);
        }
        for name in [&request.player_a, &request.player_b] {
            if !self.ledger.contains(name) {
                return Err(GameError::UnknownPlayer(name.clone()));
            }
        }
        validate_geometry(request.width, request.height, request.sequence_size)?;
        validate_special_sequences(request.sequence_size, &request.special_sequences)?;

        let declared: SpecialSequences = request
            .special_sequences
            .iter()
            .map(|s| *s as usize)
            .collect();
        let started = Match::new(
            &request.player_a,
            &request.player_b,
            request.width as usize,
            request.height as usize,
            request.sequence_size as usize,
            declared,
        );
        info!(
            player_a = %request.player_a,
            player_b = %request.player_b,
            width = request.width,
            height = request.height,
            sequence_size = request.sequence_size,
            "Match started"
        );
        Ok(self.active.insert(started))
    }

    /// Ends the match by resignation.
    ///
    /// With no `opponent`, the other seat is credited the win. With both
    /// names given the match ends as a draw. Both seats record a game.
    ///
    /// # Errors
    ///
    /// [`GameError::NoMatch`] or [`GameError::PlayerNotSeated`].
    #[instrument(skip(self))]
    pub fn resign(&mut self, name: &str, opponent: Option<&str>) -> Result<(), GameError> {
        let active = self.active.as_ref().ok_or(GameError::NoMatch)?;
        let seat = active
            .seat_of(name)
            .ok_or_else(|| GameError::PlayerNotSeated(name.to_string()))?;
        if let Some(other) = opponent {
            if active.seat_of(other).is_none() {
                return Err(GameError::PlayerNotSeated(other.to_string()));
            }
        }

        let credited = match opponent {
            None => Some(seat.opponent()),
            Some(_) => None,
        };
        info!(?credited, "Resignation accepted");
        self.finish(credited);
        Ok(())
    }

    /// Validates and plays a move, ending the match if it wins.
    ///
    /// # Errors
    ///
    /// [`GameError::NoMatch`], [`GameError::PlayerNotSeated`],
    /// [`GameError::SizeUnavailable`] or [`GameError::InvalidPosition`].
    #[instrument(skip(self, request), fields(request = %request))]
    pub fn make_move(&mut self, request: &MoveRequest) -> Result<MoveOutcome, GameError> {
        let active = self.active.as_mut().ok_or(GameError::NoMatch)?;
        let seat = active
            .seat_of(&request.player)
            .ok_or_else(|| GameError::PlayerNotSeated(request.player.clone()))?;

        let placements =
            active.drop_piece(seat, request.size, request.column, request.extension)?;

        if let Some(winning) = active.winning_placement(seat, &placements) {
            info!(?winning, player = %request.player, "Sequence completed");
            self.terminate_on_win(seat);
            return Ok(MoveOutcome::Won {
                winner: request.player.clone(),
                placements,
            });
        }
        Ok(MoveOutcome::Placed(placements))
    }

    /// Dimensions and remaining inventories of the active match.
    ///
    /// # Errors
    ///
    /// [`GameError::NoMatch`] if no match is active.
    pub fn describe(&self) -> Result<MatchDescription, GameError> {
        self.active
            .as_ref()
            .map(Match::describe)
            .ok_or(GameError::NoMatch)
    }

    /// Every cell, top row first, with 1-indexed coordinates.
    ///
    /// # Errors
    ///
    /// [`GameError::NoMatch`] if no match is active.
    #[instrument(skip(self))]
    pub fn dump(&self) -> Result<Vec<CellView>, GameError> {
        let active = self.active.as_ref().ok_or(GameError::NoMatch)?;
        let cells = active
            .board()
            .rows()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter().enumerate().map(move |(c, cell)| {
                    CellView::new(r + 1, c + 1, active.owner_name(*cell).map(str::to_string))
                })
            })
            .collect::<Vec<_>>();
        debug!(count = cells.len(), "Board dumped");
        Ok(cells)
    }

    /// Owner names row by row, top row first.
    ///
    /// # Errors
    ///
    /// [`GameError::NoMatch`] if no match is active.
    pub fn grid(&self) -> Result<Vec<Vec<Option<&str>>>, GameError> {
        let active = self.active.as_ref().ok_or(GameError::NoMatch)?;
        Ok(active
            .board()
            .rows()
            .map(|row| row.iter().map(|cell| active.owner_name(*cell)).collect())
            .collect())
    }

    /// Writes the whole state to `path`.
    ///
    /// # Errors
    ///
    /// [`CodecError`] if the file cannot be written.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        codec::save(self, path.as_ref())
    }

    /// Replaces the whole state with the contents of `path`. On error the
    /// current state is kept.
    ///
    /// # Errors
    ///
    /// [`CodecError`] if the file cannot be read or is malformed.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let loaded = codec::load(path.as_ref())?;
        *self = loaded;
        info!(
            players = self.ledger.len(),
            in_match = self.in_match(),
            "State loaded"
        );
        Ok(())
    }

    /// Credits the winner, records the game for both seats, ends the match.
    #[instrument(skip(self))]
    fn terminate_on_win(&mut self, winner: Seat) {
        self.finish(Some(winner));
    }

    /// Shared teardown: both seats record a game, `credited` also records a
    /// win, then the board and inventories are discarded.
    fn finish(&mut self, credited: Option<Seat>) {
        let Some(ended) = self.active.take() else {
            return;
        };
        for seat in Seat::iter() {
            let name = ended.seated(seat).name();
            match self.ledger.get_mut(name) {
                Some(player) => player.record_game(credited == Some(seat)),
                None => warn!(name = %name, "Seated player missing from ledger"),
            }
        }
        info!(?credited, "Match ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Extension, Placement};

    fn engine_with(names: &[&str]) -> GameEngine {
        let mut engine = GameEngine::new();
        for name in names {
            engine.register(name).unwrap();
        }
        engine
    }

    fn start(engine: &mut GameEngine, width: i64, height: i64, seq: i64, sizes: Vec<i64>) {
        engine
            .start(StartRequest::new(
                "ana".into(),
                "rui".into(),
                width,
                height,
                seq,
                sizes,
            ))
            .unwrap();
    }

    fn play(engine: &mut GameEngine, who: &str, size: i64, column: i64) -> Result<MoveOutcome, GameError> {
        engine.make_move(&MoveRequest::new(who.into(), size, column, Extension::Leftward))
    }

    fn stats(engine: &GameEngine, name: &str) -> (u32, u32) {
        let player = engine.ledger().get(name).unwrap();
        (*player.games_played(), *player.wins())
    }

    #[test]
    fn test_unregister_rules() {
        let mut engine = engine_with(&["ana", "rui", "eva"]);
        start(&mut engine, 7, 4, 4, vec![]);
        assert_eq!(
            engine.unregister("ana"),
            Err(GameError::PlayerSeated("ana".into()))
        );
        assert_eq!(
            engine.unregister("zé"),
            Err(GameError::UnknownPlayer("zé".into()))
        );
        assert!(engine.unregister("eva").is_ok());
    }

    #[test]
    fn test_start_error_order() {
        let mut engine = engine_with(&["ana", "rui"]);
        let bad = StartRequest::new("ana".into(), "nobody".into(), 9, 3, 9, vec![9]);
        assert_eq!(
            engine.start(bad),
            Err(GameError::UnknownPlayer("nobody".into()))
        );

        let bad = StartRequest::new("ana".into(), "rui".into(), 9, 3, 9, vec![9]);
        assert!(matches!(
            engine.start(bad),
            Err(GameError::InvalidDimensions { .. })
        ));

        start(&mut engine, 9, 4, 4, vec![3]);
        let again = StartRequest::new("x".into(), "y".into(), 0, 0, 0, vec![]);
        assert_eq!(engine.start(again), Err(GameError::MatchAlreadyActive));
    }

    #[test]
    fn test_vertical_win_records_stats() {
        let mut engine = engine_with(&["ana", "rui"]);
        start(&mut engine, 7, 4, 4, vec![]);
        for _ in 0..3 {
            assert!(matches!(
                play(&mut engine, "ana", 1, 4),
                Ok(MoveOutcome::Placed(_))
            ));
        }
        let outcome = play(&mut engine, "ana", 1, 4).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Won {
                winner: "ana".into(),
                placements: vec![Placement::new(0, 3)],
            }
        );
        assert!(!engine.in_match());
        assert_eq!(stats(&engine, "ana"), (1, 1));
        assert_eq!(stats(&engine, "rui"), (1, 0));
    }

    #[test]
    fn test_resign_credits_opponent() {
        let mut engine = engine_with(&["ana", "rui"]);
        start(&mut engine, 7, 4, 4, vec![]);
        engine.resign("rui", None).unwrap();
        assert_eq!(stats(&engine, "ana"), (1, 1));
        assert_eq!(stats(&engine, "rui"), (1, 0));
        assert_eq!(engine.resign("rui", None), Err(GameError::NoMatch));
    }

    #[test]
    fn test_mutual_resignation_is_a_draw() {
        let mut engine = engine_with(&["ana", "rui"]);
        start(&mut engine, 7, 4, 4, vec![]);
        engine.resign("ana", Some("rui")).unwrap();
        assert_eq!(stats(&engine, "ana"), (1, 0));
        assert_eq!(stats(&engine, "rui"), (1, 0));
    }

    #[test]
    fn test_resign_with_unseated_opponent_changes_nothing() {
        let mut engine = engine_with(&["ana", "rui", "eva"]);
        start(&mut engine, 7, 4, 4, vec![]);
        assert_eq!(
            engine.resign("ana", Some("eva")),
            Err(GameError::PlayerNotSeated("eva".into()))
        );
        assert!(engine.in_match());
        assert_eq!(stats(&engine, "ana"), (0, 0));
    }

    #[test]
    fn test_move_error_order() {
        let mut engine = engine_with(&["ana", "rui", "eva"]);
        assert_eq!(play(&mut engine, "ana", 1, 1), Err(GameError::NoMatch));
        start(&mut engine, 7, 4, 4, vec![2]);
        assert_eq!(
            play(&mut engine, "eva", 1, 1),
            Err(GameError::PlayerNotSeated("eva".into()))
        );
        assert_eq!(
            play(&mut engine, "ana", 3, 1),
            Err(GameError::SizeUnavailable(3))
        );
        assert_eq!(
            play(&mut engine, "ana", 2, 1),
            Err(GameError::InvalidPosition { size: 2, column: 1 })
        );
        assert!(play(&mut engine, "ana", 2, 2).is_ok());
        assert_eq!(
            play(&mut engine, "ana", 2, 4),
            Err(GameError::SizeUnavailable(2))
        );
    }

    #[test]
    fn test_dump_and_grid() {
        let mut engine = engine_with(&["ana", "rui"]);
        start(&mut engine, 4, 2, 3, vec![]);
        play(&mut engine, "rui", 1, 2).unwrap();

        let cells = engine.dump().unwrap();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], CellView::new(1, 1, None));
        assert_eq!(cells[5], CellView::new(2, 2, Some("rui".into())));

        let grid = engine.grid().unwrap();
        assert_eq!(grid[1], vec![None, Some("rui"), None, None]);
    }

    #[test]
    fn test_oversized_board_rejected() {
        let mut engine = engine_with(&["ana", "rui"]);
        let huge = StartRequest::new(
            "ana".into(),
            "rui".into(),
            4_294_967_296,
            8_589_934_592,
            3,
            vec![],
        );
        assert!(matches!(
            engine.start(huge),
            Err(GameError::InvalidDimensions { .. })
        ));
        let tall = StartRequest::new("ana".into(), "rui".into(), 2, 100_000_000_000, 1, vec![]);
        assert!(engine.start(tall).is_err());
        assert!(!engine.in_match());
    }

    #[test]
    fn test_move_with_extreme_columns() {
        let mut engine = engine_with(&["ana", "rui"]);
        start(&mut engine, 7, 4, 4, vec![2]);
        for (size, column, extension) in [
            (1, i64::MIN, Extension::Leftward),
            (1, i64::MAX, Extension::Leftward),
            (2, i64::MAX, Extension::Rightward),
            (2, i64::MIN, Extension::Rightward),
        ] {
            assert_eq!(
                engine.make_move(&MoveRequest::new("ana".into(), size, column, extension)),
                Err(GameError::InvalidPosition { size, column })
            );
        }
        assert_eq!(engine.active_match().unwrap().board().occupied(), 0);
        assert_eq!(engine.describe().unwrap().seats()[0].histogram(), &vec![(2, 1)]);
    }

    #[test]
    fn test_describe_requires_match() {
        let engine = engine_with(&["ana"]);
        assert_eq!(engine.describe(), Err(GameError::NoMatch));
        assert_eq!(engine.dump(), Err(GameError::NoMatch));
    }
}
