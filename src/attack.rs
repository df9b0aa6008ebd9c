//! Attack and check detection
//!
//! Pure queries over a [`Position`]: scan the eight ray directions up to
//! the first blocker for opposing sliders, then probe the knight, pawn
//! and king attack squares. Worst case touches every square once.

use crate::board::{PieceKind, Position, Square};

/// Orthogonal and diagonal ray directions with the slider kinds that
/// attack along them (queen attacks along all eight).
const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

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

/// Check whether `sq` is attacked by the side not to move.
///
/// `sq` is in the current perspective, so enemy pawns advance toward
/// row 7 and attack from the row above the target.
pub fn is_square_attacked(pos: &Position, sq: Square) -> bool {
    attacked_by_slider(pos, sq, &ORTHOGONAL, PieceKind::Rook)
        || attacked_by_slider(pos, sq, &DIAGONAL, PieceKind::Bishop)
        || attacked_by_probe(pos, sq, &KNIGHT_OFFSETS, PieceKind::Knight)
        || attacked_by_pawn(pos, sq)
        || attacked_by_king(pos, sq)
}

/// Check whether the mover's own king is in check
#[inline]
pub fn in_check(pos: &Position) -> bool {
    is_square_attacked(pos, pos.own_king_square())
}

fn attacked_by_slider(
    pos: &Position,
    sq: Square,
    directions: &[(i8, i8)],
    slider: PieceKind,
) -> bool {
    for &(dr, dc) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(dr, dc) {
            current = next;
            match pos.piece_at(current) {
                None => continue,
                Some(piece) => {
                    if piece.color != pos.side_to_move
                        && (piece.kind == slider || piece.kind == PieceKind::Queen)
                    {
                        return true;
                    }
                    break; // First occupied square blocks the ray
                }
            }
        }
    }
    false
}

fn attacked_by_probe(pos: &Position, sq: Square, offsets: &[(i8, i8)], kind: PieceKind) -> bool {
    for &(dr, dc) in offsets {
        if let Some(target) = sq.offset(dr, dc) {
            if let Some(piece) = pos.piece_at(target) {
                if piece.color != pos.side_to_move && piece.kind == kind {
                    return true;
                }
            }
        }
    }
    false
}

/// Enemy pawns sit toward row 0 and capture downward, so the attacking
/// squares are the two diagonally behind the target.
fn attacked_by_pawn(pos: &Position, sq: Square) -> bool {
    attacked_by_probe(pos, sq, &[(-1, -1), (-1, 1)], PieceKind::Pawn)
}

fn attacked_by_king(pos: &Position, sq: Square) -> bool {
    let offsets = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];
    attacked_by_probe(pos, sq, &offsets, PieceKind::King)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Piece, PieceKind::*};

    fn bare_kings() -> Position {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos
    }

    #[test]
    fn test_startpos_not_in_check() {
        assert!(!in_check(&Position::startpos()));
    }

    #[test]
    fn test_rook_attack_along_file() {
        let mut pos = bare_kings();
        pos.put_piece(Square::new(0, 0), Piece::new(Rook, Color::Black));

        assert!(is_square_attacked(&pos, Square::new(5, 0)));
        assert!(is_square_attacked(&pos, Square::new(0, 3)));
        assert!(!is_square_attacked(&pos, Square::new(5, 1)));
    }

    #[test]
    fn test_slider_blocked_by_any_piece() {
        let mut pos = bare_kings();
        pos.put_piece(Square::new(0, 0), Piece::new(Rook, Color::Black));
        // Friendly blocker from the rook's point of view
        pos.put_piece(Square::new(3, 0), Piece::new(Pawn, Color::Black));

        assert!(is_square_attacked(&pos, Square::new(2, 0)));
        assert!(!is_square_attacked(&pos, Square::new(5, 0)));
    }

    #[test]
    fn test_bishop_and_queen_diagonals() {
        let mut pos = bare_kings();
        pos.put_piece(Square::new(2, 2), Piece::new(Bishop, Color::Black));
        assert!(is_square_attacked(&pos, Square::new(5, 5)));
        assert!(!is_square_attacked(&pos, Square::new(2, 5)));

        let mut pos = bare_kings();
        pos.put_piece(Square::new(2, 2), Piece::new(Queen, Color::Black));
        assert!(is_square_attacked(&pos, Square::new(5, 5)));
        assert!(is_square_attacked(&pos, Square::new(2, 5)));
    }

    #[test]
    fn test_knight_probe() {
        let mut pos = bare_kings();
        pos.put_piece(Square::new(3, 3), Piece::new(Knight, Color::Black));

        assert!(is_square_attacked(&pos, Square::new(5, 4)));
        assert!(is_square_attacked(&pos, Square::new(1, 2)));
        assert!(!is_square_attacked(&pos, Square::new(4, 4)));
    }

    #[test]
    fn test_pawn_attacks_downward_only() {
        let mut pos = bare_kings();
        pos.put_piece(Square::new(3, 3), Piece::new(Pawn, Color::Black));

        // Enemy pawns advance toward row 7
        assert!(is_square_attacked(&pos, Square::new(4, 2)));
        assert!(is_square_attacked(&pos, Square::new(4, 4)));
        assert!(!is_square_attacked(&pos, Square::new(2, 2)));
        assert!(!is_square_attacked(&pos, Square::new(4, 3)));
    }

    #[test]
    fn test_own_pieces_do_not_attack() {
        let mut pos = bare_kings();
        pos.put_piece(Square::new(3, 3), Piece::new(Rook, Color::White));
        assert!(!is_square_attacked(&pos, Square::new(3, 0)));
    }

    #[test]
    fn test_own_king_adjacency_is_not_an_attack() {
        // The transit check for castling probes squares next to the
        // mover's own king; only the enemy king counts.
        let pos = bare_kings();
        assert!(!is_square_attacked(&pos, Square::new(7, 3)));
        assert!(is_square_attacked(&pos, Square::new(1, 4)));
    }

    #[test]
    fn test_in_check_detects_check() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 0), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(0, 4), Piece::new(Rook, Color::Black));

        assert!(in_check(&pos));

        // Interpose a pawn and the check disappears
        pos.put_piece(Square::new(4, 4), Piece::new(Pawn, Color::White));
        assert!(!in_check(&pos));
    }
}
