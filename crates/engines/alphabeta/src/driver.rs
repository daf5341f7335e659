//! Iterative deepening under a per-move time budget.

use std::time::Duration;

use chess_core::{allot, Move, Position, SearchResult, TimeControl};
use tracing::debug;

use crate::config::SearchConfig;
use crate::ordering::order_moves;
use crate::search::Search;

/// Picks a move for the side to move, spending `total_time_remaining / time_divisor`.
///
/// Returns `None` only when the position has no legal moves.
pub fn find_best_move(
    pos: &mut Position,
    max_depth: u8,
    total_time_remaining: Duration,
    config: &SearchConfig,
) -> Option<Move> {
    let budget = allot(total_time_remaining, Duration::ZERO, config.time_divisor);
    search_with_budget(pos, max_depth, Some(budget), config).best_move
}

/// Runs depths `1..=max_depth` until the budget (if any) is spent and reports the
/// result of the last iteration that produced a move. The clock starts on entry.
///
/// `pos` is restored before returning.
pub fn search_with_budget(
    pos: &mut Position,
    max_depth: u8,
    budget: Option<Duration>,
    config: &SearchConfig,
) -> SearchResult {
    let mut search = Search::new(config, TimeControl::start(budget));

    let legal = pos.legal_moves();
    if legal.is_empty() {
        let score = search.static_eval(pos, 0);
        return SearchResult::no_move(score);
    }
    let mut root_moves = order_moves(pos, legal);

    let mut result = SearchResult {
        best_move: None,
        score: 0,
        depth: 0,
        nodes: 0,
        stopped: false,
    };

    for depth in 1..=max_depth.max(1) {
        if result.best_move.is_some() && search.is_expired() {
            result.stopped = true;
            break;
        }

        let outcome = search.search_root(pos, &root_moves, depth);
        let Some((best, score)) = outcome.best else {
            break;
        };
        result.best_move = Some(best);
        result.score = score;
        result.depth = depth;

        debug!(
            depth,
            score,
            nodes = search.nodes(),
            elapsed_ms = search.time_control().elapsed().as_millis() as u64,
            best = %best,
            complete = outcome.complete,
            "iteration finished"
        );

        if !outcome.complete {
            result.stopped = true;
            break;
        }

        // Search the previous best first on the next iteration.
        if let Some(i) = root_moves.iter().position(|&mv| mv == best) {
            root_moves[..=i].rotate_right(1);
        }
    }

    result.nodes = search.nodes();
    debug!(
        cache_hits = search.cache().hits(),
        cache_misses = search.cache().misses(),
        cache_used = search.cache().len(),
        "search finished"
    );
    result
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod driver_tests;
