//! Random Move Chess Engine
//!
//! Picks uniformly among the legal moves. A baseline opponent for the
//! alpha-beta engine and a quick check of the protocol plumbing.

use chess_core::{Engine, Position, SearchLimits, SearchResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;


/// A chess engine that plays random legal moves.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> SearchResult {
        let moves = pos.legal_moves();
        let Some(&best) = moves.choose(&mut self.rng) else {
            return SearchResult::no_move(0);
        };
        debug!(choices = moves.len(), best = %best, "random move");

        SearchResult {
            best_move: Some(best),
            score: 0,
            depth: 1,
            nodes: 1,
            stopped: false,
        }
    }

    fn name(&self) -> &str {
        "RandomMoves 0.1"
    }
}
