//! Static evaluation.
//!
//! Scores are in centipawns from White's point of view regardless of whose turn it
//! is: positive favours White, negative favours Black.

use chess_core::{BitBoard, Board, Color, Piece, Position};

use crate::pst::square_bonus;

pub type Score = i32;

/// Score of a checkmated position, signed against the side that was mated.
pub const MATE_SCORE: Score = 1_000_000;

/// Bound for search windows, strictly outside every reachable score.
pub const INFINITY: Score = i32::MAX / 2;

/// Deepest mate the search can report a distance for.
pub const MAX_MATE_PLY: Score = 1_000;

/// True for scores that announce a forced mate.
#[inline]
pub fn is_mate_score(score: Score) -> bool {
    (MATE_SCORE - MAX_MATE_PLY..=MATE_SCORE).contains(&score.abs())
}

/// A child's score seen from its parent: a mate one ply further away counts one
/// point less, so shorter mates win ties. Other scores pass through.
#[inline]
pub fn back_one_ply(score: Score) -> Score {
    if is_mate_score(score) {
        score - score.signum()
    } else {
        score
    }
}

/// Inverse of [`back_one_ply`], for passing a parent's window bounds to a child.
#[inline]
pub fn forward_one_ply(bound: Score) -> Score {
    if is_mate_score(bound) {
        bound + bound.signum()
    } else {
        bound
    }
}

/// Full moves until mate: positive when the side the score favours mates,
/// negative when it is mated. `score` is relative to the side to move.
pub fn mate_in_moves(score: Score) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = MATE_SCORE - score.abs();
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

pub const MOBILITY_WEIGHT: Score = 10;
pub const PAWN_STRUCTURE_WEIGHT: Score = 50;
pub const DEFAULT_REPETITION_PENALTY: Score = 50;

const FILE_A: u64 = 0x0101_0101_0101_0101;

/// Material values in centipawns.
#[inline]
pub fn material_value(piece: Piece) -> Score {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// +1 for White, -1 for Black.
#[inline]
pub fn color_sign(color: Color) -> Score {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// The individual terms of a static evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Set for checkmate (±`MATE_SCORE`) and dead draws (0); other terms are then zero.
    pub terminal: Option<Score>,
    pub material: Score,
    pub positional: Score,
    pub mobility: Score,
    pub pawn_structure: Score,
    pub repetition: Score,
}

impl Evaluation {
    pub fn total(&self) -> Score {
        match self.terminal {
            Some(score) => score,
            None => {
                self.material
                    + self.positional
                    + self.mobility
                    + self.pawn_structure
                    + self.repetition
            }
        }
    }
}

/// Static evaluator. Pure: it reads the position and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    pub repetition_penalty: Score,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            repetition_penalty: DEFAULT_REPETITION_PENALTY,
        }
    }
}

impl Evaluator {
    pub fn evaluate(&self, pos: &Position) -> Score {
        self.breakdown(pos).total()
    }

    pub fn breakdown(&self, pos: &Position) -> Evaluation {
        let mover = pos.side_to_move();
        let legal_moves = pos.legal_move_count();

        if legal_moves == 0 {
            let terminal = if pos.in_check() {
                // The side to move has been mated.
                -color_sign(mover) * MATE_SCORE
            } else {
                0
            };
            return Evaluation {
                terminal: Some(terminal),
                ..Evaluation::default()
            };
        }
        if pos.is_insufficient_material() {
            return Evaluation {
                terminal: Some(0),
                ..Evaluation::default()
            };
        }

        let board = pos.board();
        // Mobility counts only the side to move, signed by whose turn it is.
        let mobility = color_sign(mover) * MOBILITY_WEIGHT * legal_moves as Score;
        let weaknesses = pawn_weaknesses(board, Color::White) - pawn_weaknesses(board, Color::Black);
        // The side that just moved created the repetition.
        let repetition = if pos.is_repetition() {
            color_sign(mover) * self.repetition_penalty
        } else {
            0
        };

        Evaluation {
            terminal: None,
            material: material(board),
            positional: positional(board),
            mobility,
            pawn_structure: -PAWN_STRUCTURE_WEIGHT * weaknesses,
            repetition,
        }
    }
}

/// Evaluates with the default weights.
pub fn evaluate(pos: &Position) -> Score {
    Evaluator::default().evaluate(pos)
}

pub fn breakdown(pos: &Position) -> Evaluation {
    Evaluator::default().breakdown(pos)
}

/// White material minus Black material.
pub fn material(board: &Board) -> Score {
    Piece::ALL
        .iter()
        .map(|&piece| {
            let white = board.colored_pieces(Color::White, piece).len() as Score;
            let black = board.colored_pieces(Color::Black, piece).len() as Score;
            material_value(piece) * (white - black)
        })
        .sum()
}

/// Piece-square bonuses, White minus Black.
pub fn positional(board: &Board) -> Score {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        for piece in Piece::ALL {
            for sq in board.colored_pieces(color, piece) {
                score += color_sign(color) * square_bonus(piece, color, sq);
            }
        }
    }
    score
}

/// Doubled, isolated and blocked pawns of one colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnWeaknesses {
    pub doubled: Score,
    pub isolated: Score,
    pub blocked: Score,
}

impl PawnWeaknesses {
    pub fn total(&self) -> Score {
        self.doubled + self.isolated + self.blocked
    }
}

pub fn pawn_structure(board: &Board, color: Color) -> PawnWeaknesses {
    let pawns = board.colored_pieces(color, Piece::Pawn).0;
    let occupied = board.occupied().0;

    let mut doubled = 0;
    for file in 0..8 {
        let on_file = (pawns & (FILE_A << file)).count_ones() as Score;
        doubled += (on_file - 1).max(0);
    }

    let mut isolated = 0;
    for sq in BitBoard(pawns) {
        if (pawns & adjacent_files(sq as usize % 8)) == 0 {
            isolated += 1;
        }
    }

    // Pawns never stand on the last rank, so the shift cannot wrap onto the board.
    let squares_ahead = match color {
        Color::White => pawns << 8,
        Color::Black => pawns >> 8,
    };
    let blocked = (squares_ahead & occupied).count_ones() as Score;

    PawnWeaknesses {
        doubled,
        isolated,
        blocked,
    }
}

fn pawn_weaknesses(board: &Board, color: Color) -> Score {
    pawn_structure(board, color).total()
}

fn adjacent_files(file: usize) -> u64 {
    let mut mask = 0;
    if file > 0 {
        mask |= FILE_A << (file - 1);
    }
    if file < 7 {
        mask |= FILE_A << (file + 1);
    }
    mask
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
