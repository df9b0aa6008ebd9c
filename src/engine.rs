//! Engine facade
//!
//! Owns a searcher (and with it a transposition table that persists
//! between moves of the same game) and hands out moves under a
//! configured budget.

use std::time::Duration;

use log::info;

use crate::board::Position;
use crate::moves::Move;
use crate::search::{SearchLimits, SearchResult, Searcher};

/// A configured engine instance. Cheap to create; the transposition
/// table is allocated once and reused across `choose_move` calls.
pub struct Engine {
    searcher: Searcher,
    limits: SearchLimits,
}

impl Engine {
    /// Create an engine with the given search limits
    pub fn new(limits: SearchLimits) -> Self {
        Engine {
            searcher: Searcher::new(),
            limits,
        }
    }

    /// Create an engine searching to a fixed depth
    pub fn with_depth(depth: u8) -> Self {
        Self::new(SearchLimits {
            depth,
            ..Default::default()
        })
    }

    /// Configured maximum depth
    pub fn depth(&self) -> u8 {
        self.limits.depth
    }

    /// Set an optional wall-clock budget per move
    pub fn set_time_budget(&mut self, budget: Option<Duration>) {
        self.limits.time = budget;
    }

    /// Pick a move for the side to move, or None if it has no legal
    /// move (the game is already over).
    pub fn choose_move(&mut self, pos: &Position) -> Option<Move> {
        self.think(pos).best_move
    }

    /// Run a full search and return the complete result
    pub fn think(&mut self, pos: &Position) -> SearchResult {
        let result = self.searcher.search(pos, &self.limits);
        match result.best_move {
            Some(mv) => info!(
                "chose {} score {} depth {} nodes {}",
                mv, result.score, result.depth, result.nodes
            ),
            None => info!("no legal move available"),
        }
        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchLimits::default())
    }
}
