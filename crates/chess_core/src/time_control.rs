//! Time control and search limits.
//!
//! The search is single threaded and cooperative: nothing interrupts it from the
//! outside. Instead the search polls a [`TimeControl`] at well-defined points and,
//! once the budget is spent, stops expanding nodes and falls back to static scores.

use std::time::{Duration, Instant};

/// Search limits handed from the protocol layer to an engine.
///
/// The per-move budget is derived in priority order: `infinite` (no budget), an
/// explicit `move_time`, an allotment from the remaining `clock`, and finally an
/// allotment from the engine's default clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth in plies
    pub depth: Option<u8>,
    /// Clock time remaining for the side to move
    pub clock: Option<Duration>,
    /// Increment gained per move
    pub increment: Duration,
    /// Fixed time for this move, used verbatim as the budget
    pub move_time: Option<Duration>,
    /// Search until the depth cap regardless of time
    pub infinite: bool,
}

impl SearchLimits {
    /// Limits with only a depth constraint; the engine allots from its default clock.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    /// Limits with a depth cap and the mover's remaining clock.
    pub fn clock(depth: u8, remaining: Duration) -> Self {
        Self {
            depth: Some(depth),
            clock: Some(remaining),
            ..Self::default()
        }
    }

    /// Limits with a depth cap and a fixed budget for this move.
    pub fn move_time(depth: u8, budget: Duration) -> Self {
        Self {
            depth: Some(depth),
            move_time: Some(budget),
            ..Self::default()
        }
    }

    /// Resolves the budget for this move; `None` means unlimited.
    pub fn budget(&self, default_clock: Duration, divisor: u32) -> Option<Duration> {
        if self.infinite {
            return None;
        }
        if let Some(fixed) = self.move_time {
            return Some(fixed);
        }
        Some(allot(
            self.clock.unwrap_or(default_clock),
            self.increment,
            divisor,
        ))
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: None,
            clock: None,
            increment: Duration::ZERO,
            move_time: None,
            infinite: false,
        }
    }
}

/// Share of the remaining clock to spend on one move: `remaining / divisor`
/// plus half the increment, never more than what is left on the clock.
pub fn allot(remaining: Duration, increment: Duration, divisor: u32) -> Duration {
    let base = remaining / divisor.max(1);
    (base + increment / 2).min(remaining)
}

/// Wall-clock budget for one search, started when the search starts.
#[derive(Debug, Clone, Copy)]
pub struct TimeControl {
    start: Instant,
    /// Time limit for this search (None = infinite)
    budget: Option<Duration>,
}

impl TimeControl {
    /// Starts the clock now.
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// A clock that never expires.
    pub fn unlimited() -> Self {
        Self::start(None)
    }

    /// True once the elapsed time exceeds the budget.
    #[inline]
    pub fn is_expired(&self) -> bool {
        match self.budget {
            Some(limit) => self.start.elapsed() > limit,
            None => false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.budget?;
        Some(limit.saturating_sub(self.elapsed()))
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
