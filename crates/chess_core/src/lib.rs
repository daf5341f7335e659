pub mod error;
pub mod position;
pub mod time_control;
pub mod uci;

// Board primitives come from the rules library; engines build on these directly.
pub use cozy_chess::{BitBoard, Board, Color, File, Move, Piece, Rank, Square};

pub use error::*;
pub use position::*;
pub use time_control::*;
pub use uci::*;

// =============================================================================
// Engine trait: implemented by the search engine, driven by the UCI layer
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns, positive favouring White
    pub score: i32,
    /// Deepest iteration that produced the best move
    pub depth: u8,
    /// Number of nodes searched (optional, for stats)
    pub nodes: u64,
    /// Whether search was stopped early due to time limit
    pub stopped: bool,
}

impl SearchResult {
    /// Outcome for a position without legal moves.
    pub fn no_move(score: i32) -> Self {
        Self {
            best_move: None,
            score,
            depth: 0,
            nodes: 0,
            stopped: false,
        }
    }
}

/// Trait that the protocol layer drives.
pub trait Engine {
    /// Search the position with the given search limits.
    ///
    /// # Arguments
    /// * `pos` - The current position to analyze; it is left unchanged
    /// * `limits` - Search limits (depth, time, etc.)
    ///
    /// # Returns
    /// SearchResult containing best move, score, and statistics
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name for UCI identification
    fn name(&self) -> &str;

    /// Returns the engine's author for UCI identification
    fn author(&self) -> &str {
        "ML-chess"
    }

    /// Reset internal state for a new game.
    fn new_game(&mut self) {}

    /// UCI `option` declarations, one per line, without the leading `option`.
    fn options(&self) -> Vec<String> {
        Vec::new()
    }

    /// Optional: Set a UCI option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
