//! Search tunables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::MAX_CAPACITY;
use crate::eval::{Evaluator, Score};

pub const MAX_DEPTH: u8 = 64;
pub const MAX_QUIESCENCE_DEPTH: u8 = 64;
pub const MAX_TIME_DIVISOR: u32 = 1_000;
pub const MAX_REPETITION_PENALTY: Score = 10_000;

/// Tunables for one engine instance. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Iterative-deepening cap when `go` names no depth
    pub default_depth: u8,
    /// Clock assumed when `go` names no time, in milliseconds
    pub default_clock_ms: u64,
    /// Per-move budget is the remaining clock divided by this
    pub time_divisor: u32,
    /// Centipawns charged for steering into an earlier position
    pub repetition_penalty: Score,
    /// Extend leaves with a capture/check search
    pub quiescence: bool,
    /// Ply cap on the quiescence extension
    pub quiescence_depth: u8,
    /// Evaluation cache slots (rounded up to a power of two)
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_depth: 5,
            default_clock_ms: 50_000,
            time_divisor: 25,
            repetition_penalty: 50,
            quiescence: false,
            quiescence_depth: 8,
            cache_capacity: 1 << 18,
        }
    }
}

impl SearchConfig {
    pub fn default_clock(&self) -> Duration {
        Duration::from_millis(self.default_clock_ms)
    }

    /// Pulls every tunable into the range the engine supports.
    pub fn clamped(self) -> Self {
        Self {
            default_depth: self.default_depth.clamp(1, MAX_DEPTH),
            time_divisor: self.time_divisor.clamp(1, MAX_TIME_DIVISOR),
            repetition_penalty: self.repetition_penalty.clamp(0, MAX_REPETITION_PENALTY),
            quiescence_depth: self.quiescence_depth.min(MAX_QUIESCENCE_DEPTH),
            cache_capacity: self.cache_capacity.clamp(1, MAX_CAPACITY),
            ..self
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator {
            repetition_penalty: self.repetition_penalty,
        }
    }
}
