//! Long-algebraic move tokens as spoken by the UCI protocol.

use cozy_chess::{Board, File, Move, Piece, Square};

use crate::error::MoveError;

/// Token reported when the side to move has no legal move.
pub const NULL_MOVE_TOKEN: &str = "0000";

/// Renders `mv` (legal in `board`) as a UCI token such as `e2e4` or `e7e8q`.
///
/// The board library encodes castling as the king taking its own rook; the protocol
/// expects the king's two-square step (`e1g1`), so castling is translated here.
pub fn move_to_uci(board: &Board, mv: Move) -> String {
    let is_castle = board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move());
    let mut token = String::with_capacity(5);
    token.push_str(&mv.from.to_string());
    if is_castle {
        let file = if (mv.to.file() as usize) > (mv.from.file() as usize) {
            File::G
        } else {
            File::C
        };
        token.push_str(&Square::new(file, mv.from.rank()).to_string());
    } else {
        token.push_str(&mv.to.to_string());
    }
    if let Some(promo) = mv.promotion {
        token.push(promotion_char(promo));
    }
    token
}

/// Resolves a UCI token against the legal moves of `board`.
///
/// Both castling encodings are accepted (`e1g1` and `e1h1`). A promotion letter is
/// required when the move promotes.
pub fn parse_uci_move(board: &Board, token: &str) -> Result<Move, MoveError> {
    let token = token.trim();
    if !is_well_formed(token) {
        return Err(MoveError::Malformed(token.to_string()));
    }
    let wanted = token.to_ascii_lowercase();

    let mut found = None;
    board.generate_moves(|moves| {
        for mv in moves {
            if move_to_uci(board, mv) == wanted || mv.to_string() == wanted {
                found = Some(mv);
                return true;
            }
        }
        false
    });

    found.ok_or_else(|| MoveError::Illegal {
        token: token.to_string(),
        fen: board.to_string(),
    })
}

fn is_well_formed(token: &str) -> bool {
    let b = token.as_bytes();
    if b.len() != 4 && b.len() != 5 {
        return false;
    }
    let file_ok = |c: u8| (b'a'..=b'h').contains(&c.to_ascii_lowercase());
    let rank_ok = |c: u8| (b'1'..=b'8').contains(&c);
    let squares_ok = file_ok(b[0]) && rank_ok(b[1]) && file_ok(b[2]) && rank_ok(b[3]);
    let promo_ok = b
        .get(4)
        .map_or(true, |c| matches!(c.to_ascii_lowercase(), b'q' | b'r' | b'b' | b'n'));
    squares_ok && promo_ok
}

fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
