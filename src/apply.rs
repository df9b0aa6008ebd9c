//! Move application and the legality gate
//!
//! Applies a single move to a clone of the input position, handling all
//! special-move bookkeeping, then rejects the result if the mover's own
//! king is left in check. Rejection is an ordinary `None`, never a
//! panic: illegal candidates are a frequent outcome on the search path.
//!
//! The generator does not tag moves with a category, so the applier
//! reclassifies each move (plain, double step, en passant, castle) from
//! the moved piece's kind, the square deltas and board occupancy.
//! Callers are expected to pass pseudo-legal moves; out-of-bounds
//! coordinates cannot be represented by [`Move`] and a position with a
//! broken orientation invariant is a caller bug, not a handled case.

use crate::attack;
use crate::board::{EnPassant, Piece, PieceKind, Position, Square};
use crate::moves::Move;

/// Apply `mv` to a clone of `pos`.
///
/// Returns the resulting position still in the mover's perspective; the
/// caller flips it to hand the turn over. `None` means the move was
/// rejected and `pos` is untouched.
pub fn apply_move(pos: &Position, mv: Move) -> Option<Position> {
    let mut next = pos.clone();

    // The flag must advance before the move is interpreted: a double
    // step this ply arms a target for the next one.
    advance_en_passant(&mut next);

    let from = mv.from();
    let to = mv.to();
    let mut piece = next.piece_at(from)?;
    if piece.color != next.side_to_move {
        return None;
    }
    let captured = next.piece_at(to);
    if let Some(target) = captured {
        if target.color == next.side_to_move {
            return None;
        }
    }

    match piece.kind {
        PieceKind::Pawn if from.row() == 6 && to.row() == 4 && from.col() == to.col() => {
            // Behind-the-pawn square, recorded in the opponent's
            // (post-flip) coordinates
            let behind = Square::new(to.row() + 1, to.col());
            next.en_passant = Some(EnPassant {
                square: behind.flip(),
                armed: false,
            });
        }
        PieceKind::Pawn if from.col() != to.col() && captured.is_none() => {
            // A pawn stepping diagonally onto an empty square is only
            // ever an en passant capture
            let ep = next.en_passant?;
            if !(ep.armed && ep.square == to) {
                return None;
            }
            // The captured pawn stands beside the destination
            next.set_piece(Square::new(from.row(), to.col()), None);
        }
        PieceKind::King
            if from.row() == 7 && to.row() == 7 && from.col().abs_diff(to.col()) == 2 =>
        {
            castle(&mut next, from, to)?;
        }
        _ => {}
    }

    next.stall_clock += 1;
    if piece.kind == PieceKind::Pawn || captured.is_some() {
        next.stall_clock = 0;
    }

    if piece.kind == PieceKind::Pawn && to.row() == 0 {
        piece = Piece::new(PieceKind::Queen, piece.color);
    }
    if matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
        piece = piece.moved();
    }

    next.set_piece(to, Some(piece));
    next.set_piece(from, None);
    if piece.kind == PieceKind::King {
        next.set_own_king_square(to);
    }

    if attack::in_check(&next) {
        None
    } else {
        Some(next)
    }
}

/// Two-ply lifecycle step: a fresh target arms, an armed one expires.
fn advance_en_passant(pos: &mut Position) {
    if let Some(ep) = pos.en_passant {
        pos.en_passant = if ep.armed {
            None
        } else {
            Some(EnPassant { armed: true, ..ep })
        };
    }
}

/// Validate a castle and relocate the rook. The king itself is moved by
/// the caller afterward.
///
/// The king may not castle out of or through an attacked square; the
/// destination square is covered by the applier's final check test.
fn castle(next: &mut Position, from: Square, to: Square) -> Option<()> {
    let king = next.piece_at(from)?;
    if king.has_moved || from != Square::new(7, next.side_to_move.king_home_col()) {
        return None;
    }

    let rook_col = if to.col() < from.col() { 0u8 } else { 7u8 };
    let rook_sq = Square::new(7, rook_col);
    let rook = match next.piece_at(rook_sq) {
        Some(r) if r.kind == PieceKind::Rook && r.color == next.side_to_move && !r.has_moved => r,
        _ => return None,
    };

    let (lo, hi) = if rook_col == 0 {
        (0, from.col())
    } else {
        (from.col(), 7)
    };
    if !(lo + 1..hi).all(|c| next.piece_at(Square::new(7, c)).is_none()) {
        return None;
    }

    let transit = Square::new(7, (from.col() + to.col()) / 2);
    if attack::is_square_attacked(next, from) || attack::is_square_attacked(next, transit) {
        return None;
    }

    next.set_piece(transit, Some(rook.moved()));
    next.set_piece(rook_sq, None);
    Some(())
}
