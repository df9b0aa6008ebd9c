//! Game-level move contract and status detection
//!
//! Thin layer over generation and application: a proposed move is
//! accepted only if generation produces it and application proves it
//! legal. Rejections are plain return values.

use serde::{Deserialize, Serialize};

use crate::apply::apply_move;
use crate::attack;
use crate::board::{Color, Position};
use crate::movegen::generate_moves;
use crate::moves::Move;

/// Side that won a decisive game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// State of the game from the mover's seat
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The mover has at least one legal move
    Ongoing,
    /// The mover is in check with no legal reply
    Checkmate(Winner),
    /// The mover has no legal reply but is not in check
    Stalemate,
    /// The stall clock reached fifty quiet half-moves
    ForcedDraw,
}

/// Attempt a half-move for the side to move.
///
/// Returns the successor position, already flipped so the opponent is
/// the new mover, or None if the move is not legal. The input position
/// is never modified.
pub fn attempt_move(pos: &Position, mv: Move) -> Option<Position> {
    if !generate_moves(pos).contains(mv) {
        return None;
    }
    let mut next = apply_move(pos, mv)?;
    next.flip();
    Some(next)
}

/// Whether the side to move has at least one legal move
pub fn has_legal_move(pos: &Position) -> bool {
    generate_moves(pos)
        .into_iter()
        .any(|mv| apply_move(pos, mv).is_some())
}

/// Classify the position for the side to move.
///
/// Mate and stalemate are checked before the stall rule so a mating
/// move on the fiftieth quiet half-move still decides the game.
pub fn game_status(pos: &Position) -> GameStatus {
    if !has_legal_move(pos) {
        return if attack::in_check(pos) {
            GameStatus::Checkmate(Winner::from(pos.side_to_move.opposite()))
        } else {
            GameStatus::Stalemate
        };
    }

    if pos.stall_clock >= 50 {
        return GameStatus::ForcedDraw;
    }

    GameStatus::Ongoing
}
