//! Errors raised at the rules boundary.

use thiserror::Error;

/// Failure to build a position from board notation.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Failure to turn a move token into a legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The token is not a coordinate pair with an optional promotion letter.
    #[error("malformed move token `{0}`")]
    Malformed(String),
    /// The token is well formed but not legal in the position.
    #[error("illegal move `{token}` in position `{fen}`")]
    Illegal { token: String, fen: String },
}
