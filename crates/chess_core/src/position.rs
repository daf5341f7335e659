//! Game position with repetition history and reversible move application.
//!
//! `Position` wraps a `cozy_chess::Board` (which supplies legal move generation and
//! the Zobrist key) and adds what the search needs on top of it:
//! - the hash of every earlier position, for repetition detection
//! - an undo stack, so moves can be applied and retracted in place
//! - a scoped [`MoveGuard`] that retracts its move on every exit path

use std::fmt;
use std::ops::{Deref, DerefMut};

use cozy_chess::{Board, Color, GameStatus, Move, Piece, Square};

use crate::error::{MoveError, PositionError};
use crate::uci::parse_uci_move;

#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    /// Hashes of all earlier positions, oldest first.
    history: Vec<u64>,
    /// Boards restored by `pop`, one per pushed move.
    undo: Vec<Board>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        Self::from_board(Board::default())
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            history: Vec::with_capacity(128),
            undo: Vec::with_capacity(128),
        }
    }

    /// Parses standard Forsyth-Edwards Notation. Half-move and full-move counters
    /// may be omitted and default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let normalized = match fields.len() {
            4 => format!("{} 0 1", fields.join(" ")),
            5 => format!("{} 1", fields.join(" ")),
            _ => fields.join(" "),
        };
        Board::from_fen(&normalized, false)
            .map(Self::from_board)
            .map_err(|e| PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{e:?}"),
            })
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Canonical Zobrist key: piece placement, side to move, castling and en passant.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    pub fn halfmove_clock(&self) -> u8 {
        self.board.halfmove_clock()
    }

    /// Number of moves currently on the undo stack.
    pub fn ply(&self) -> usize {
        self.undo.len()
    }

    // =========================================================================
    // Move generation
    // =========================================================================

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.legal_moves_into(&mut out);
        out
    }

    /// Fills `out` with every legal move, reusing its allocation.
    pub fn legal_moves_into(&self, out: &mut Vec<Move>) {
        out.clear();
        self.board.generate_moves(|moves| {
            out.extend(moves);
            false
        });
    }

    pub fn legal_move_count(&self) -> usize {
        let mut count = 0usize;
        self.board.generate_moves(|moves| {
            count += moves.len() as usize;
            false
        });
        count
    }

    pub fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|moves| !moves.is_empty())
    }

    // =========================================================================
    // Apply / undo
    // =========================================================================

    /// Applies a legal move in place. Every `push` must be paired with a `pop`.
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.board.is_legal(mv), "push of illegal move {mv}");
        self.history.push(self.board.hash());
        self.undo.push(self.board.clone());
        self.board.play_unchecked(mv);
    }

    /// Retracts the most recent `push`.
    ///
    /// # Panics
    /// If there is no move to retract. That means the push/pop discipline is broken
    /// and the position no longer matches any search line.
    pub fn pop(&mut self) {
        let previous = self
            .undo
            .pop()
            .expect("pop without a matching push: position state is corrupted");
        self.history.pop();
        self.board = previous;
    }

    /// Applies `mv` and returns a guard that derefs to the resulting position and
    /// retracts the move when dropped.
    pub fn play(&mut self, mv: Move) -> MoveGuard<'_> {
        self.push(mv);
        MoveGuard { pos: self }
    }

    /// Parses a move token against the legal moves and applies it.
    pub fn apply_uci(&mut self, token: &str) -> Result<Move, MoveError> {
        let mv = parse_uci_move(&self.board, token)?;
        self.push(mv);
        Ok(mv)
    }

    // =========================================================================
    // Game state
    // =========================================================================

    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_moves()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.board.halfmove_clock() >= 100
    }

    /// Neither side can ever deliver mate: bare kings, a single minor piece,
    /// or bishops that all stand on the same square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if knights.len() + bishops.len() <= 1 {
            return true;
        }
        if !knights.is_empty() {
            return false;
        }
        let dark = bishops.into_iter().filter(|&sq| is_dark(sq)).count();
        dark == 0 || dark == bishops.len() as usize
    }

    /// How many times the current position occurred earlier in the game.
    /// Only the reversible stretch since the last capture or pawn move is scanned.
    pub fn repetitions(&self) -> usize {
        let key = self.board.hash();
        let window = self.board.halfmove_clock() as usize;
        self.history
            .iter()
            .rev()
            .take(window)
            .filter(|&&h| h == key)
            .count()
    }

    /// True when the current position has been seen before in this game.
    pub fn is_repetition(&self) -> bool {
        self.repetitions() >= 1
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions() >= 2
    }

    /// Checkmate, stalemate, insufficient material, fifty-move rule or threefold repetition.
    pub fn is_game_over(&self) -> bool {
        !matches!(self.board.status(), GameStatus::Ongoing)
            || self.is_fifty_move_draw()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
    }

    // =========================================================================
    // Move classification
    // =========================================================================

    pub fn moved_piece(&self, mv: Move) -> Option<Piece> {
        self.board.piece_on(mv.from)
    }

    /// Castling is encoded as the king capturing its own rook.
    pub fn is_castle(&self, mv: Move) -> bool {
        self.moved_piece(mv) == Some(Piece::King)
            && self.board.color_on(mv.to) == Some(self.side_to_move())
    }

    pub fn is_en_passant(&self, mv: Move) -> bool {
        self.moved_piece(mv) == Some(Piece::Pawn)
            && mv.from.file() != mv.to.file()
            && self.board.piece_on(mv.to).is_none()
    }

    pub fn captured_piece(&self, mv: Move) -> Option<Piece> {
        if self.is_en_passant(mv) {
            return Some(Piece::Pawn);
        }
        match self.board.color_on(mv.to) {
            Some(color) if color != self.side_to_move() => self.board.piece_on(mv.to),
            _ => None,
        }
    }

    pub fn is_capture(&self, mv: Move) -> bool {
        self.captured_piece(mv).is_some()
    }

    /// Speculatively plays `mv` and reports whether it checks the opponent.
    pub fn gives_check(&mut self, mv: Move) -> bool {
        self.play(mv).in_check()
    }

    /// Speculatively plays `mv` and reports whether it repeats an earlier position.
    pub fn leads_to_repetition(&mut self, mv: Move) -> bool {
        self.play(mv).is_repetition()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

fn is_dark(sq: Square) -> bool {
    (sq.file() as usize + sq.rank() as usize) % 2 == 0
}

/// A move held on a [`Position`]; dropping the guard retracts it.
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.pos
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.pos
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.pos.pop();
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
