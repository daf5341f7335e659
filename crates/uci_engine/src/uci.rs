//! UCI session: reads commands line by line and writes responses.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use alphabeta_engine::mate_in_moves;
use chess_core::{
    move_to_uci, Color, Engine, MoveError, Position, PositionError, SearchLimits, NULL_MOVE_TOKEN,
};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum UciError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: {reason}")]
    Malformed {
        command: &'static str,
        reason: String,
    },

    #[error(transparent)]
    InvalidPosition(#[from] PositionError),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A move in `position ... moves` that cannot be played. The game history the
    /// host claims no longer matches ours, so the session cannot go on.
    #[error("cannot replay move {index} of the move list")]
    Replay {
        index: usize,
        #[source]
        source: MoveError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl UciError {
    /// Fatal errors end the session; the rest are reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, UciError::Replay { .. } | UciError::Io(_))
    }

    fn malformed(command: &'static str, reason: impl Into<String>) -> Self {
        UciError::Malformed {
            command,
            reason: reason.into(),
        }
    }
}

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct UciSession<E: Engine, W: Write> {
    engine: E,
    out: W,
    pos: Position,
}

impl<E: Engine, W: Write> UciSession<E, W> {
    pub fn new(engine: E, out: W) -> Self {
        Self {
            engine,
            out,
            pos: Position::startpos(),
        }
    }

    #[cfg(test)]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Serves commands until `quit`, end of input or a fatal error.
    ///
    /// Bytes that are not UTF-8 are replaced rather than treated as a read
    /// failure, so a garbled line is answered like any unknown command.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<(), UciError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            if self.handle_line(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Handles one command line. Recoverable problems are reported to the host as
    /// `info string` and serving continues; fatal ones are returned.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, UciError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }
        debug!(command = line.trim(), "received");

        match self.dispatch(&tokens) {
            Ok(flow) => Ok(flow),
            Err(err) if err.is_fatal() => {
                error!(error = %err, command = line.trim(), "fatal protocol error");
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, command = line.trim(), "ignoring command");
                writeln!(self.out, "info string {err}")?;
                self.out.flush()?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, tokens: &[&str]) -> Result<Flow, UciError> {
        match tokens[0] {
            "uci" => self.cmd_uci()?,
            "isready" => {
                writeln!(self.out, "readyok")?;
                self.out.flush()?;
            }
            "ucinewgame" => {
                self.engine.new_game();
                self.pos = Position::startpos();
            }
            "position" => self.cmd_position(&tokens[1..])?,
            "go" => self.cmd_go(&tokens[1..])?,
            "setoption" => self.cmd_setoption(&tokens[1..])?,
            // Searches run to completion before the next command is read.
            "stop" => {}
            "quit" => return Ok(Flow::Quit),
            other => return Err(UciError::UnknownCommand(other.to_string())),
        }
        Ok(Flow::Continue)
    }

    fn cmd_uci(&mut self) -> Result<(), UciError> {
        writeln!(self.out, "id name {}", self.engine.name())?;
        writeln!(self.out, "id author {}", self.engine.author())?;
        for option in self.engine.options() {
            writeln!(self.out, "option {option}")?;
        }
        writeln!(self.out, "uciok")?;
        self.out.flush()?;
        Ok(())
    }

    /// `position startpos|fen <fen> [moves <m1> <m2> ...]`
    fn cmd_position(&mut self, args: &[&str]) -> Result<(), UciError> {
        let moves_at = args.iter().position(|&t| t == "moves");
        let (base, moves) = match moves_at {
            Some(i) => (&args[..i], &args[i + 1..]),
            None => (args, &args[args.len()..]),
        };

        let mut pos = match base.split_first() {
            Some((&"startpos", [])) => Position::startpos(),
            Some((&"fen", fields)) if !fields.is_empty() => Position::from_fen(&fields.join(" "))?,
            _ => return Err(UciError::malformed("position", "expected startpos or fen <fen>")),
        };

        for (index, token) in moves.iter().enumerate() {
            pos.apply_uci(token)
                .map_err(|source| UciError::Replay { index, source })?;
        }
        self.pos = pos;
        Ok(())
    }

    /// `go [depth N] [wtime ms] [btime ms] [winc ms] [binc ms] [movetime ms] [movestogo N] [infinite]`
    fn cmd_go(&mut self, args: &[&str]) -> Result<(), UciError> {
        let limits = parse_go(args, self.pos.side_to_move())?;
        debug!(?limits, "go");

        let started = Instant::now();
        let result = self.engine.search(&self.pos, limits);
        let elapsed = started.elapsed();

        // UCI scores are from the mover's point of view.
        let score = match self.pos.side_to_move() {
            Color::White => result.score,
            Color::Black => -result.score,
        };
        let score = match mate_in_moves(score) {
            Some(moves) => format!("mate {moves}"),
            None => format!("cp {score}"),
        };
        writeln!(
            self.out,
            "info depth {} score {} nodes {} time {}",
            result.depth,
            score,
            result.nodes,
            elapsed.as_millis()
        )?;

        let token = match result.best_move {
            Some(mv) => move_to_uci(self.pos.board(), mv),
            None => NULL_MOVE_TOKEN.to_string(),
        };
        writeln!(self.out, "bestmove {token}")?;
        self.out.flush()?;
        Ok(())
    }

    /// `setoption name <name> [value <value>]`
    fn cmd_setoption(&mut self, args: &[&str]) -> Result<(), UciError> {
        if args.first() != Some(&"name") {
            return Err(UciError::malformed("setoption", "expected name <option>"));
        }
        let rest = &args[1..];
        let (name, value) = match rest.iter().position(|&t| t == "value") {
            Some(i) => (rest[..i].join(" "), rest[i + 1..].join(" ")),
            None => (rest.join(" "), String::new()),
        };
        if name.is_empty() {
            return Err(UciError::malformed("setoption", "missing option name"));
        }
        if !self.engine.set_option(&name, &value) {
            return Err(UciError::UnknownOption(format!("{name} = {value}")));
        }
        debug!(%name, %value, "option set");
        Ok(())
    }
}

/// Builds search limits from `go` arguments. The clock and increment are the ones
/// belonging to `side`.
pub fn parse_go(args: &[&str], side: Color) -> Result<SearchLimits, UciError> {
    let mut limits = SearchLimits::default();
    let mut iter = args.iter();

    while let Some(&key) = iter.next() {
        match key {
            "infinite" => limits.infinite = true,
            "depth" => limits.depth = Some(parse_value(key, iter.next())?),
            "movetime" => limits.move_time = Some(millis(parse_value(key, iter.next())?)),
            "wtime" | "btime" => {
                let remaining = millis(parse_value::<i64>(key, iter.next())?.max(0) as u64);
                if (key == "wtime") == (side == Color::White) {
                    limits.clock = Some(remaining);
                }
            }
            "winc" | "binc" => {
                let increment = millis(parse_value::<i64>(key, iter.next())?.max(0) as u64);
                if (key == "winc") == (side == Color::White) {
                    limits.increment = increment;
                }
            }
            // Accepted for compatibility; the budget only uses the clock.
            "movestogo" | "nodes" | "mate" => {
                parse_value::<u64>(key, iter.next())?;
            }
            "ponder" => debug!("pondering is not supported"),
            // Everything after searchmoves is a move list, which is not supported.
            "searchmoves" => {
                debug!("ignoring searchmoves");
                break;
            }
            other => {
                return Err(UciError::malformed("go", format!("unknown parameter {other}")));
            }
        }
    }
    Ok(limits)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: Option<&&str>) -> Result<T, UciError> {
    let value = value.ok_or_else(|| UciError::malformed("go", format!("{key} needs a value")))?;
    value
        .parse()
        .map_err(|_| UciError::malformed("go", format!("{key}: not a number: {value}")))
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
