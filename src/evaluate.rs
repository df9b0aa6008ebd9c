//! Static position evaluation
//!
//! Centipawn material plus piece-square bonuses, always scored from the
//! side to move's perspective (positive favors the mover). Tables are
//! written in the grid's own orientation, row 0 being the far side, so
//! the mover's pieces index them directly and the opponent's through a
//! 180 degree mirror.
//!
//! The king uses separate middlegame and endgame tables: once the total
//! non-king material thins out the king stops hiding and becomes an
//! active piece.

use crate::board::{PieceKind, Position, Square};

/// Below this much total non-king material the endgame king table is
/// used instead of the middlegame one.
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 2200;

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-50,-50,
];

/// Positional bonus for a piece kind on a square, from the perspective
/// the square is expressed in.
fn square_bonus(kind: PieceKind, sq: Square, endgame: bool) -> i32 {
    let idx = sq.index();
    match kind {
        PieceKind::Pawn => PAWN_TABLE[idx],
        PieceKind::Knight => KNIGHT_TABLE[idx],
        PieceKind::Bishop => BISHOP_TABLE[idx],
        PieceKind::Rook => ROOK_TABLE[idx],
        PieceKind::Queen => QUEEN_TABLE[idx],
        PieceKind::King => {
            if endgame {
                KING_ENDGAME_TABLE[idx]
            } else {
                KING_MIDDLEGAME_TABLE[idx]
            }
        }
    }
}

/// Static score for `pos` in centipawns, positive favoring the mover
pub fn evaluate(pos: &Position) -> i32 {
    let endgame = pos.total_material() < ENDGAME_MATERIAL_THRESHOLD;

    let mut total = 0;
    for row in 0..8 {
        for col in 0..8 {
            let sq = Square::new(row, col);
            let piece = match pos.piece_at(sq) {
                Some(p) => p,
                None => continue,
            };

            if piece.color == pos.side_to_move {
                total += piece.kind.value() + square_bonus(piece.kind, sq, endgame);
            } else {
                // The opponent sees the board rotated 180 degrees
                total -= piece.kind.value() + square_bonus(piece.kind, sq.flip(), endgame);
            }
        }
    }
    total
}
