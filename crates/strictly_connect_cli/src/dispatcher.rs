//! Line-oriented command loop over a [`GameEngine`].

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use derive_more::{Display, Error};
use strictly_connect::{
    Extension, GameEngine, GameError, MoveOutcome, MoveRequest, StartRequest,
};
use tracing::{debug, info, instrument, warn};

use crate::command::{Arguments, CommandCode};
use crate::reply::Reply;

/// Width of one `X` grid cell.
const GRID_CELL_WIDTH: usize = 8;

/// Placeholder printed by `X` for an empty cell.
const GRID_EMPTY: &str = "----";

/// Owner printed by `VR` for an empty cell.
const DUMP_EMPTY: &str = "Vazio";

/// Failure reading commands or writing replies.
#[derive(Debug, Display, Error)]
#[display("Dispatch error: {} at {}:{}", message, file, line)]
pub struct DispatchError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DispatchError {
    /// Creates a new dispatch error with caller location tracking.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for DispatchError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

/// Reads commands from `input`, applies them to the engine and writes
/// replies to `output`.
pub struct Dispatcher<R, W> {
    engine: GameEngine,
    input: R,
    output: W,
    data_file: PathBuf,
}

impl<R: BufRead, W: Write> Dispatcher<R, W> {
    /// Creates a dispatcher with an empty engine.
    pub fn new(input: R, output: W, data_file: impl Into<PathBuf>) -> Self {
        Self {
            engine: GameEngine::new(),
            input,
            output,
            data_file: data_file.into(),
        }
    }

    /// Current engine state.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Consumes the dispatcher and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Processes lines until an empty line or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if reading input or writing output fails.
    #[instrument(skip(self), fields(data_file = %self.data_file.display()))]
    pub fn run(&mut self) -> Result<(), DispatchError> {
        info!("Session started");
        let mut count = 0usize;
        while let Some(line) = self.next_line()? {
            if line.trim().is_empty() {
                break;
            }
            self.execute(&line)?;
            count += 1;
        }
        self.output.flush()?;
        info!(commands = count, "Session ended");
        Ok(())
    }

    /// Next input line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>, DispatchError> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    /// Runs one command line. `IJ` also consumes the two lines after it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if reading follow-up lines or writing the
    /// reply fails.
    #[instrument(skip(self))]
    pub fn execute(&mut self, line: &str) -> Result<(), DispatchError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((code, rest)) = tokens.split_first() else {
            return self.reply(Reply::InvalidInstruction);
        };
        let args = Arguments::new(rest);
        let Ok(command) = CommandCode::from_str(code) else {
            debug!(code, "Unknown command code");
            return self.reply(Reply::InvalidInstruction);
        };
        debug!(%command, "Dispatching");

        match command {
            CommandCode::Register => self.register(args),
            CommandCode::Unregister => self.unregister(args),
            CommandCode::List => self.list(),
            CommandCode::Start => self.start(args),
            CommandCode::Resign => self.resign(args),
            CommandCode::Describe => self.describe(),
            CommandCode::Move => self.make_move(args),
            CommandCode::Dump => self.dump(),
            CommandCode::Grid => self.grid(),
            CommandCode::Save => self.save(),
            CommandCode::Load => self.load(),
        }
    }

    fn reply(&mut self, reply: Reply) -> Result<(), DispatchError> {
        writeln!(self.output, "{}", reply)?;
        Ok(())
    }

    fn register(&mut self, args: Arguments<'_>) -> Result<(), DispatchError> {
        let Some(name) = args.text(0) else {
            return self.reply(Reply::InvalidInstruction);
        };
        let reply = match self.engine.register(name) {
            Ok(()) => Reply::PlayerRegistered,
            Err(e) => e.into(),
        };
        self.reply(reply)
    }

    fn unregister(&mut self, args: Arguments<'_>) -> Result<(), DispatchError> {
        let Some(name) = args.text(0) else {
            return self.reply(Reply::InvalidInstruction);
        };
        let reply = match self.engine.unregister(name) {
            Ok(_) => Reply::PlayerRemoved,
            Err(GameError::UnknownPlayer(_)) => Reply::PlayerMissing,
            Err(e) => e.into(),
        };
        self.reply(reply)
    }

    fn list(&mut self) -> Result<(), DispatchError> {
        let players = self.engine.list();
        if players.is_empty() {
            return self.reply(Reply::NoPlayers);
        }
        for player in players {
            writeln!(
                self.output,
                "{} {} {}",
                player.name(),
                player.games_played(),
                player.wins()
            )?;
        }
        Ok(())
    }

    fn start(&mut self, args: Arguments<'_>) -> Result<(), DispatchError> {
        let geometry_line = self.next_line()?.unwrap_or_default();
        let sizes_line = self.next_line()?.unwrap_or_default();

        let geometry_tokens: Vec<&str> = geometry_line.split_whitespace().collect();
        let geometry = Arguments::new(&geometry_tokens);
        let size_tokens: Vec<&str> = sizes_line.split_whitespace().collect();

        let request = match (
            args.text(0),
            args.text(1),
            geometry.number(0),
            geometry.number(1),
            geometry.number(2),
            Arguments::new(&size_tokens).numbers(),
        ) {
            (Some(a), Some(b), Some(width), Some(height), Some(seq), Some(sizes)) => {
                StartRequest::new(a.to_string(), b.to_string(), width, height, seq, sizes)
            }
            _ => {
                debug!(%geometry_line, %sizes_line, "Malformed start arguments");
                return self.reply(Reply::InvalidInstruction);
            }
        };

        let names = (request.player_a.clone(), request.player_b.clone());
        let reply = match self.engine.start(request) {
            Ok(_) => Reply::started(&names.0, &names.1),
            Err(e) => e.into(),
        };
        self.reply(reply)
    }

    fn resign(&mut self, args: Arguments<'_>) -> Result<(), DispatchError> {
        let Some(name) = args.text(0) else {
            return self.reply(Reply::InvalidInstruction);
        };
        let reply = match self.engine.resign(name, args.text(1)) {
            Ok(()) => Reply::Resigned,
            Err(e) => e.into(),
        };
        self.reply(reply)
    }

    fn describe(&mut self) -> Result<(), DispatchError> {
        let description = match self.engine.describe() {
            Ok(description) => description,
            Err(e) => return self.reply(e.into()),
        };
        writeln!(
            self.output,
            "{} {}",
            description.width(),
            description.height()
        )?;
        for seat in description.seats() {
            writeln!(self.output, "{}", seat.name())?;
            for (size, count) in seat.histogram() {
                writeln!(self.output, "{} {}", size, count)?;
            }
        }
        Ok(())
    }

    fn make_move(&mut self, args: Arguments<'_>) -> Result<(), DispatchError> {
        let (Some(name), Some(size), Some(column)) = (args.text(0), args.number(1), args.number(2))
        else {
            return self.reply(Reply::InvalidInstruction);
        };
        let request = MoveRequest::new(
            name.to_string(),
            size,
            column,
            Extension::from_marker(args.text(3)),
        );
        let reply = match self.engine.make_move(&request) {
            Ok(MoveOutcome::Placed(_)) => Reply::PiecePlaced,
            Ok(MoveOutcome::Won { .. }) => Reply::SequenceCompleted,
            Err(e) => e.into(),
        };
        self.reply(reply)
    }

    fn dump(&mut self) -> Result<(), DispatchError> {
        let cells = match self.engine.dump() {
            Ok(cells) => cells,
            Err(e) => return self.reply(e.into()),
        };
        for cell in cells {
            writeln!(
                self.output,
                "{} {} {}",
                cell.row,
                cell.column,
                cell.owner.as_deref().unwrap_or(DUMP_EMPTY)
            )?;
        }
        Ok(())
    }

    fn grid(&mut self) -> Result<(), DispatchError> {
        let rendered: Result<Vec<String>, GameError> = self.engine.grid().map(|rows| {
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|owner| {
                            format!(
                                "{:>width$}",
                                owner.unwrap_or(GRID_EMPTY),
                                width = GRID_CELL_WIDTH
                            )
                        })
                        .collect()
                })
                .collect()
        });
        match rendered {
            Ok(rows) => {
                for row in rows {
                    writeln!(self.output, "{}", row)?;
                }
                Ok(())
            }
            Err(e) => self.reply(e.into()),
        }
    }

    fn save(&mut self) -> Result<(), DispatchError> {
        let reply = match self.engine.save(&self.data_file) {
            Ok(()) => Reply::Saved,
            Err(e) => {
                warn!(error = %e, "Save command failed");
                Reply::SaveFailed
            }
        };
        self.reply(reply)
    }

    fn load(&mut self) -> Result<(), DispatchError> {
        let reply = match self.engine.load(&self.data_file) {
            Ok(()) => Reply::Loaded,
            Err(e) => {
                warn!(error = %e, "Load command failed");
                Reply::LoadFailed
            }
        };
        self.reply(reply)
    }
}
