//! Pseudo-legal move generation
//!
//! Enumerates moves consistent with piece movement patterns and board
//! occupancy. Whether a move leaves the mover's own king in check is not
//! decided here; that is the applier's job. The generator can restrict
//! itself to "active" moves (captures, promotions, en passant) so
//! quiescence search never pays for quiet moves it will not look at.

use crate::board::{PieceKind, Position, Square};
use crate::moves::{Move, MoveList};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Generate all pseudo-legal moves for the side to move
pub fn generate_moves(pos: &Position) -> MoveList {
    generate(pos, false)
}

/// Generate only captures, promotions and en passant captures
pub fn generate_active(pos: &Position) -> MoveList {
    generate(pos, true)
}

fn generate(pos: &Position, active_only: bool) -> MoveList {
    let mut moves = MoveList::new();

    for row in 0..8 {
        for col in 0..8 {
            let from = Square::new(row, col);
            let piece = match pos.piece_at(from) {
                Some(p) if p.color == pos.side_to_move => p,
                _ => continue,
            };

            match piece.kind {
                PieceKind::Pawn => pawn_moves(pos, from, active_only, &mut moves),
                PieceKind::Knight => probe_moves(pos, from, &KNIGHT_OFFSETS, active_only, &mut moves),
                PieceKind::Bishop => slider_moves(pos, from, &BISHOP_DIRECTIONS, active_only, &mut moves),
                PieceKind::Rook => slider_moves(pos, from, &ROOK_DIRECTIONS, active_only, &mut moves),
                PieceKind::Queen => {
                    slider_moves(pos, from, &BISHOP_DIRECTIONS, active_only, &mut moves);
                    slider_moves(pos, from, &ROOK_DIRECTIONS, active_only, &mut moves);
                }
                PieceKind::King => {
                    probe_moves(pos, from, &KING_OFFSETS, active_only, &mut moves);
                    if !active_only {
                        castle_moves(pos, from, piece.has_moved, &mut moves);
                    }
                }
            }
        }
    }

    moves
}

/// Pawns always advance toward row 0 under the orientation invariant.
fn pawn_moves(pos: &Position, from: Square, active_only: bool, moves: &mut MoveList) {
    // Single step, and double step from the start rank
    if let Some(one) = from.offset(-1, 0) {
        if pos.piece_at(one).is_none() {
            // A push to row 0 promotes, which counts as active
            if !active_only || one.row() == 0 {
                moves.push(Move::new(from, one));
            }
            if !active_only && from.row() == 6 {
                let two = Square::new(4, from.col());
                if pos.piece_at(two).is_none() {
                    moves.push(Move::new(from, two));
                }
            }
        }
    }

    // Diagonal captures, including en passant
    for dc in [-1, 1] {
        let target = match from.offset(-1, dc) {
            Some(sq) => sq,
            None => continue,
        };
        match pos.piece_at(target) {
            Some(p) if p.color != pos.side_to_move => moves.push(Move::new(from, target)),
            Some(_) => {}
            None => {
                // A pending en passant target arms during the coming
                // application, so it is capturable exactly this ply
                if let Some(ep) = pos.en_passant {
                    if !ep.armed && ep.square == target {
                        moves.push(Move::new(from, target));
                    }
                }
            }
        }
    }
}

fn probe_moves(
    pos: &Position,
    from: Square,
    offsets: &[(i8, i8)],
    active_only: bool,
    moves: &mut MoveList,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            match pos.piece_at(to) {
                None => {
                    if !active_only {
                        moves.push(Move::new(from, to));
                    }
                }
                Some(p) if p.color != pos.side_to_move => moves.push(Move::new(from, to)),
                Some(_) => {}
            }
        }
    }
}

fn slider_moves(
    pos: &Position,
    from: Square,
    directions: &[(i8, i8)],
    active_only: bool,
    moves: &mut MoveList,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(to) = current.offset(dr, dc) {
            current = to;
            match pos.piece_at(to) {
                None => {
                    if !active_only {
                        moves.push(Move::new(from, to));
                    }
                }
                Some(p) => {
                    if p.color != pos.side_to_move {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
        }
    }
}

/// Castling candidates: king unmoved on its home square, the matching
/// rook present and unmoved, every square strictly between them empty.
/// Transit-square safety is enforced by the applier.
fn castle_moves(pos: &Position, from: Square, king_has_moved: bool, moves: &mut MoveList) {
    let home = Square::new(7, pos.side_to_move.king_home_col());
    if king_has_moved || from != home {
        return;
    }

    for rook_col in [0u8, 7u8] {
        let rook_sq = Square::new(7, rook_col);
        match pos.piece_at(rook_sq) {
            Some(p)
                if p.kind == PieceKind::Rook
                    && p.color == pos.side_to_move
                    && !p.has_moved => {}
            _ => continue,
        }

        let (lo, hi) = if rook_col == 0 {
            (0, from.col())
        } else {
            (from.col(), 7)
        };
        let path_clear = (lo + 1..hi).all(|c| pos.piece_at(Square::new(7, c)).is_none());
        if !path_clear {
            continue;
        }

        let to_col = if rook_col == 0 {
            from.col() - 2
        } else {
            from.col() + 2
        };
        moves.push(Move::new(from, Square::new(7, to_col)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, EnPassant, Piece, PieceKind::*};

    #[test]
    fn test_startpos_has_twenty_moves() {
        let moves = generate_moves(&Position::startpos());
        // 16 pawn moves + 4 knight moves
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn test_startpos_has_no_active_moves() {
        assert!(generate_active(&Position::startpos()).is_empty());
    }

    #[test]
    fn test_pawn_blocked_by_occupied_square() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(6, 0), Piece::new(Pawn, Color::White));
        pos.put_piece(Square::new(5, 0), Piece::new(Knight, Color::Black));

        let moves = generate_moves(&pos);
        // Neither the single nor the double step is available
        assert!(!moves.contains(Move::new(Square::new(6, 0), Square::new(5, 0))));
        assert!(!moves.contains(Move::new(Square::new(6, 0), Square::new(4, 0))));
    }

    #[test]
    fn test_pawn_double_step_needs_both_squares_empty() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(6, 2), Piece::new(Pawn, Color::White));
        pos.put_piece(Square::new(4, 2), Piece::new(Knight, Color::Black));

        let moves = generate_moves(&pos);
        assert!(moves.contains(Move::new(Square::new(6, 2), Square::new(5, 2))));
        assert!(!moves.contains(Move::new(Square::new(6, 2), Square::new(4, 2))));
    }

    #[test]
    fn test_pawn_captures_diagonally_only_enemies() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(4, 3), Piece::new(Pawn, Color::White));
        pos.put_piece(Square::new(3, 2), Piece::new(Knight, Color::Black));
        pos.put_piece(Square::new(3, 4), Piece::new(Knight, Color::White));

        let moves = generate_moves(&pos);
        assert!(moves.contains(Move::new(Square::new(4, 3), Square::new(3, 2))));
        assert!(!moves.contains(Move::new(Square::new(4, 3), Square::new(3, 4))));
    }

    #[test]
    fn test_en_passant_candidate_only_while_pending() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(3, 3), Piece::new(Pawn, Color::White));
        pos.put_piece(Square::new(3, 4), Piece::new(Pawn, Color::Black));

        let capture = Move::new(Square::new(3, 3), Square::new(2, 4));

        pos.en_passant = Some(EnPassant {
            square: Square::new(2, 4),
            armed: false,
        });
        assert!(generate_moves(&pos).contains(capture));

        // Once armed the window has passed for generation purposes
        pos.en_passant = Some(EnPassant {
            square: Square::new(2, 4),
            armed: true,
        });
        assert!(!generate_moves(&pos).contains(capture));

        pos.en_passant = None;
        assert!(!generate_moves(&pos).contains(capture));
    }

    #[test]
    fn test_slider_stops_at_blockers() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(4, 0), Piece::new(Rook, Color::White));
        pos.put_piece(Square::new(4, 3), Piece::new(Pawn, Color::White));
        pos.put_piece(Square::new(1, 0), Piece::new(Pawn, Color::Black));

        let moves = generate_moves(&pos);
        // Friendly blocker excluded, squares beyond it unreachable
        assert!(moves.contains(Move::new(Square::new(4, 0), Square::new(4, 2))));
        assert!(!moves.contains(Move::new(Square::new(4, 0), Square::new(4, 3))));
        assert!(!moves.contains(Move::new(Square::new(4, 0), Square::new(4, 4))));
        // Enemy blocker included as a capture, not beyond
        assert!(moves.contains(Move::new(Square::new(4, 0), Square::new(1, 0))));
        assert!(!moves.contains(Move::new(Square::new(4, 0), Square::new(0, 0))));
    }

    #[test]
    fn test_castle_candidates_for_white() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(7, 0), Piece::new(Rook, Color::White));
        pos.put_piece(Square::new(7, 7), Piece::new(Rook, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));

        let moves = generate_moves(&pos);
        assert!(moves.contains(Move::new(Square::new(7, 4), Square::new(7, 2))));
        assert!(moves.contains(Move::new(Square::new(7, 4), Square::new(7, 6))));
    }

    #[test]
    fn test_castle_candidates_for_black_mirrored_home() {
        // In Black's own perspective the king sits on column 3
        let mut pos = Position::empty(Color::Black);
        pos.put_piece(Square::new(7, 3), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(7, 0), Piece::new(Rook, Color::Black));
        pos.put_piece(Square::new(7, 7), Piece::new(Rook, Color::Black));
        pos.put_piece(Square::new(0, 3), Piece::new(King, Color::White));

        let moves = generate_moves(&pos);
        assert!(moves.contains(Move::new(Square::new(7, 3), Square::new(7, 1))));
        assert!(moves.contains(Move::new(Square::new(7, 3), Square::new(7, 5))));
    }

    #[test]
    fn test_no_castle_through_occupied_path() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(7, 7), Piece::new(Rook, Color::White));
        pos.put_piece(Square::new(7, 5), Piece::new(Bishop, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));

        let moves = generate_moves(&pos);
        assert!(!moves.contains(Move::new(Square::new(7, 4), Square::new(7, 6))));
    }

    #[test]
    fn test_no_castle_after_rook_moved() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(7, 7), Piece::new(Rook, Color::White).moved());
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));

        let moves = generate_moves(&pos);
        assert!(!moves.contains(Move::new(Square::new(7, 4), Square::new(7, 6))));
    }

    #[test]
    fn test_active_subset_of_all_moves() {
        let mut pos = Position::startpos();
        // Drop an enemy pawn where two of the mover's pawns can take it
        pos.set_piece(Square::new(5, 3), Some(Piece::new(Pawn, Color::Black)));

        let all = generate_moves(&pos);
        let active = generate_active(&pos);
        assert_eq!(active.len(), 2);
        for m in &active {
            assert!(all.contains(*m));
        }
    }
}
