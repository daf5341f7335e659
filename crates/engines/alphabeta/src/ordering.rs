//! Move ordering heuristic.

use std::cmp::Reverse;

use chess_core::{Move, Position};

use crate::eval::{material_value, Score};

pub const CASTLE_BONUS: Score = 90;
pub const CHECK_BONUS: Score = 70;
pub const PROMOTION_BONUS: Score = 60;
pub const REPETITION_MALUS: Score = -100;

/// Heuristic priority of a move. The terms are independent and summed.
///
/// Speculatively plays the move to test for check and repetition; the position is
/// restored before returning.
pub fn move_score(pos: &mut Position, mv: Move) -> Score {
    let mut score = 0;

    if let Some(victim) = pos.captured_piece(mv) {
        // MVV-LVA, scaled so captures cluster around 100.
        let attacker = pos.moved_piece(mv).map_or(0, material_value);
        score += 100 + (material_value(victim) - attacker) / 100;
    }
    if pos.is_castle(mv) {
        score += CASTLE_BONUS;
    }
    if mv.promotion.is_some() {
        score += PROMOTION_BONUS;
    }

    let child = pos.play(mv);
    if child.in_check() {
        score += CHECK_BONUS;
    }
    if child.is_repetition() {
        score += REPETITION_MALUS;
    }

    score
}

/// Orders `moves` best-first. The result is a permutation of the input; moves with
/// equal scores keep their relative order.
pub fn order_moves(pos: &mut Position, moves: Vec<Move>) -> Vec<Move> {
    let mut scored: Vec<(Score, Move)> = moves
        .into_iter()
        .map(|mv| (move_score(pos, mv), mv))
        .collect();
    scored.sort_by_key(|&(score, _)| Reverse(score));
    scored.into_iter().map(|(_, mv)| mv).collect()
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
