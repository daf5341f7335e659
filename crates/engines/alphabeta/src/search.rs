//! Minimax search with alpha-beta pruning and an optional quiescence extension.
//!
//! Scores are White-relative throughout the main search: White maximises, Black
//! minimises, and the role is read from the side to move at each node. Quiescence
//! uses the negamax convention internally and is converted at its boundary.
//!
//! A mate found `n` plies below a node scores `MATE_SCORE - n` there, so the
//! search prefers the quickest mate and the slowest defeat.

use chess_core::{Color, Move, Position, TimeControl};

use crate::cache::{CacheKey, EvalCache};
use crate::config::SearchConfig;
use crate::eval::{back_one_ply, color_sign, forward_one_ply, Evaluator, Score, INFINITY};
use crate::ordering::order_moves;

/// Outcome of one pass over the root moves at a fixed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootOutcome {
    /// Best move and its White-relative score, if any root move was searched
    pub best: Option<(Move, Score)>,
    /// False when the clock ran out before every root move was searched
    pub complete: bool,
}

/// State shared by every node of one search invocation.
pub struct Search<'a> {
    config: &'a SearchConfig,
    evaluator: Evaluator,
    tc: TimeControl,
    cache: EvalCache,
    nodes: u64,
}

impl<'a> Search<'a> {
    pub fn new(config: &'a SearchConfig, tc: TimeControl) -> Self {
        Self {
            config,
            evaluator: config.evaluator(),
            tc,
            cache: EvalCache::new(config.cache_capacity),
            nodes: 0,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn cache(&self) -> &EvalCache {
        &self.cache
    }

    pub fn time_control(&self) -> &TimeControl {
        &self.tc
    }

    pub fn is_expired(&self) -> bool {
        self.tc.is_expired()
    }

    /// Searches every move in `moves` (in the given order) to `depth` plies in total
    /// and keeps the best one for the side to move. The first move is always
    /// searched; later moves are skipped once the clock has run out.
    pub fn search_root(&mut self, pos: &mut Position, moves: &[Move], depth: u8) -> RootOutcome {
        let mover = pos.side_to_move();
        let mut best: Option<(Move, Score)> = None;
        let mut complete = true;

        for (i, &mv) in moves.iter().enumerate() {
            if i > 0 && self.tc.is_expired() {
                complete = false;
                break;
            }

            // Only a strictly better score displaces the incumbent, so ties keep
            // the earlier move.
            let (alpha, beta) = match (mover, best) {
                (Color::White, Some((_, s))) => (s, INFINITY),
                (Color::Black, Some((_, s))) => (-INFINITY, s),
                (_, None) => (-INFINITY, INFINITY),
            };
            let score = self.root_move_score(pos, mv, depth.saturating_sub(1), alpha, beta);

            let improves = match best {
                None => true,
                Some((_, s)) => match mover {
                    Color::White => score > s,
                    Color::Black => score < s,
                },
            };
            if improves {
                best = Some((mv, score));
            }
        }

        RootOutcome { best, complete }
    }

    /// Score of playing `mv` at the root, searched to `depth` further plies.
    ///
    /// A move into a position seen earlier in the game is charged the repetition
    /// penalty against the mover, on top of whatever the evaluator charges.
    pub fn root_move_score(
        &mut self,
        pos: &mut Position,
        mv: Move,
        depth: u8,
        alpha: Score,
        beta: Score,
    ) -> Score {
        let mover = pos.side_to_move();
        let mut child = pos.play(mv);
        let penalty = if child.is_repetition() {
            color_sign(mover) * self.config.repetition_penalty
        } else {
            0
        };
        // Shift the window so the bounds still hold once the penalty is applied.
        let score = self.alpha_beta(
            &mut child,
            depth,
            forward_one_ply(alpha + penalty),
            forward_one_ply(beta + penalty),
        );
        back_one_ply(score) - penalty
    }

    /// Depth-limited alpha-beta. Returns a White-relative score; within the
    /// `(alpha, beta)` window it is the exact minimax value.
    ///
    /// Once the clock has expired every node returns its static evaluation.
    pub fn alpha_beta(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
    ) -> Score {
        self.nodes += 1;

        if self.tc.is_expired() {
            return self.static_eval(pos, depth);
        }
        if depth == 0 || pos.is_game_over() {
            if depth == 0 && self.config.quiescence && !pos.is_game_over() {
                return self.quiescence_root(pos, alpha, beta);
            }
            return self.static_eval(pos, depth);
        }

        let maximizing = pos.side_to_move() == Color::White;
        let legal = pos.legal_moves();
        let moves = order_moves(pos, legal);

        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for mv in moves {
            let score = {
                let mut child = pos.play(mv);
                let score = self.alpha_beta(
                    &mut child,
                    depth - 1,
                    forward_one_ply(alpha),
                    forward_one_ply(beta),
                );
                back_one_ply(score)
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }

    /// Converts the White-relative window into the mover's frame and back.
    fn quiescence_root(&mut self, pos: &mut Position, alpha: Score, beta: Score) -> Score {
        match pos.side_to_move() {
            Color::White => self.quiesce(pos, alpha, beta, 0),
            Color::Black => -self.quiesce(pos, -beta, -alpha, 0),
        }
    }

    /// Negamax quiescence over captures, promotions and checking moves. Returns a
    /// score relative to the side to move.
    pub fn quiesce(&mut self, pos: &mut Position, mut alpha: Score, beta: Score, ply: u8) -> Score {
        self.nodes += 1;

        let stand_pat = color_sign(pos.side_to_move()) * self.static_eval(pos, 0);
        if self.tc.is_expired() || ply >= self.config.quiescence_depth || pos.is_game_over() {
            return stand_pat;
        }
        if stand_pat >= beta {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);

        let legal = pos.legal_moves();
        let noisy: Vec<Move> = legal
            .into_iter()
            .filter(|&mv| pos.is_capture(mv) || mv.promotion.is_some() || pos.gives_check(mv))
            .collect();
        let moves = order_moves(pos, noisy);

        for mv in moves {
            if self.tc.is_expired() {
                break;
            }
            let score = {
                let mut child = pos.play(mv);
                -self.quiesce(&mut child, -beta, -alpha, ply + 1)
            };
            if score >= beta {
                return score;
            }
            alpha = alpha.max(score);
        }
        alpha
    }

    /// Static evaluation through the cache. The key carries the remaining depth and
    /// the repetition flag so a score is only reused in the same context.
    pub fn static_eval(&mut self, pos: &Position, depth: u8) -> Score {
        let key = CacheKey {
            hash: pos.hash(),
            depth,
            repeated: pos.is_repetition(),
        };
        if let Some(score) = self.cache.probe(key) {
            return score;
        }
        let score = self.evaluator.evaluate(pos);
        self.cache.store(key, score);
        score
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
