//! Alpha-Beta Chess Engine
//!
//! Minimax search with alpha-beta pruning over a hand-tuned evaluation.
//!
//! This engine uses:
//! - Iterative deepening under a per-move time budget
//! - Move ordering by captures, castling, checks and promotions
//! - Material, piece-square, mobility and pawn-structure evaluation
//! - Repetition penalties in both the evaluation and the root search
//! - An optional quiescence extension over captures and checks
//! - A bounded evaluation cache owned by each search

pub mod cache;
pub mod config;
pub mod driver;
pub mod eval;
pub mod ordering;
pub mod pst;
pub mod search;

use std::ops::RangeInclusive;
use std::str::FromStr;

use chess_core::{Engine, Position, SearchLimits, SearchResult};
use tracing::{info, warn};

use crate::cache::EvalCache;
use crate::config::{MAX_DEPTH, MAX_QUIESCENCE_DEPTH, MAX_REPETITION_PENALTY, MAX_TIME_DIVISOR};

pub use config::SearchConfig;
pub use driver::{find_best_move, search_with_budget};
pub use eval::{
    breakdown, evaluate, material_value, mate_in_moves, Evaluation, Evaluator, Score, INFINITY,
    MATE_SCORE,
};
pub use ordering::order_moves;

/// The engine driven by the protocol layer.
#[derive(Debug, Clone, Default)]
pub struct AlphaBetaEngine {
    config: SearchConfig,
}

impl AlphaBetaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range tunables are clamped.
    pub fn with_config(config: SearchConfig) -> Self {
        let clamped = config.clone().clamped();
        if clamped != config {
            warn!(requested = ?config, used = ?clamped, "search config clamped");
        }
        Self { config: clamped }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Engine for AlphaBetaEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        let depth = limits.depth.unwrap_or(self.config.default_depth);
        let budget = limits.budget(self.config.default_clock(), self.config.time_divisor);

        let mut pos = pos.clone();
        let result = search_with_budget(&mut pos, depth, budget, &self.config);

        info!(
            fen = %pos.fen(),
            best = ?result.best_move.map(|mv| mv.to_string()),
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            stopped = result.stopped,
            budget_ms = budget.map(|b| b.as_millis() as u64),
            "search complete"
        );
        result
    }

    fn name(&self) -> &str {
        "AlphaBeta 0.1"
    }

    fn options(&self) -> Vec<String> {
        let c = &self.config;
        vec![
            format!("name Depth type spin default {} min 1 max {MAX_DEPTH}", c.default_depth),
            format!(
                "name Hash type spin default {} min 1 max {}",
                EvalCache::megabytes_for_slots(c.cache_capacity),
                max_hash_megabytes()
            ),
            format!("name Quiescence type check default {}", c.quiescence),
            format!(
                "name QuiescenceDepth type spin default {} min 0 max {MAX_QUIESCENCE_DEPTH}",
                c.quiescence_depth
            ),
            format!(
                "name RepetitionPenalty type spin default {} min 0 max {MAX_REPETITION_PENALTY}",
                c.repetition_penalty
            ),
            format!(
                "name TimeDivisor type spin default {} min 1 max {MAX_TIME_DIVISOR}",
                c.time_divisor
            ),
        ]
    }

    /// Values outside the range `options` advertises are rejected. `Hash` is in
    /// megabytes.
    fn set_option(&mut self, name: &str, value: &str) -> bool {
        let c = &mut self.config;
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "depth" => parse_in_range(value, 1..=MAX_DEPTH, &mut c.default_depth),
            "hash" => {
                let mut megabytes = 0;
                let ok = parse_in_range(value, 1..=max_hash_megabytes(), &mut megabytes);
                if ok {
                    c.cache_capacity = EvalCache::slots_for_megabytes(megabytes);
                }
                ok
            }
            "quiescence" => parse_into(&value.to_ascii_lowercase(), &mut c.quiescence),
            "quiescencedepth" => {
                parse_in_range(value, 0..=MAX_QUIESCENCE_DEPTH, &mut c.quiescence_depth)
            }
            "repetitionpenalty" => {
                parse_in_range(value, 0..=MAX_REPETITION_PENALTY, &mut c.repetition_penalty)
            }
            "timedivisor" => parse_in_range(value, 1..=MAX_TIME_DIVISOR, &mut c.time_divisor),
            _ => false,
        }
    }
}

fn max_hash_megabytes() -> usize {
    EvalCache::megabytes_for_slots(cache::MAX_CAPACITY)
}

/// Like [`parse_into`], but only accepts values inside `range`.
fn parse_in_range<T>(value: &str, range: RangeInclusive<T>, slot: &mut T) -> bool
where
    T: FromStr + PartialOrd,
{
    match value.parse() {
        Ok(parsed) if range.contains(&parsed) => {
            *slot = parsed;
            true
        }
        _ => false,
    }
}

/// Overwrites `slot` when `value` parses; reports whether it did.
fn parse_into<T: FromStr>(value: &str, slot: &mut T) -> bool {
    match value.parse() {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}
