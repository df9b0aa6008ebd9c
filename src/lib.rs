//! Perspective-based chess engine
//!
//! The board is always stored from the mover's point of view: row 6 is
//! the mover's pawn rank and row 0 the opponent's back rank. After each
//! half-move the position is rotated 180 degrees and colors swap roles,
//! so every layer (generation, evaluation, search) only ever reasons
//! about "my pieces moving up the board".

pub mod apply;
pub mod attack;
pub mod board;
pub mod engine;
pub mod evaluate;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod search;
pub mod tt;
pub mod zobrist;

// Re-export commonly used types
pub use apply::apply_move;
pub use board::{Color, EnPassant, Piece, PieceKind, Position, Square};
pub use engine::Engine;
pub use game::{attempt_move, game_status, GameStatus, Winner};
pub use movegen::{generate_active, generate_moves};
pub use moves::{Move, MoveList};
pub use search::{SearchLimits, SearchResult, Searcher};
