//! Board representation and game state
//!
//! The board is an 8x8 grid stored from the side to move's perspective:
//! row 6 is always the mover's pawn start rank and row 0 the opponent's
//! back rank. Changing whose turn it is goes through [`Position::flip`],
//! which rotates the grid 180 degrees, and nothing else.

use std::fmt;

/// Square on the board (0-63), row-major from the mover's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square(pub u8);

impl Square {
    /// Create square from row and column
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Square(row * 8 + col)
    }

    /// Get row (0 = opponent's back rank, 7 = own back rank)
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Get column (0-7)
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Get index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The same physical square seen from the opposite perspective
    #[inline]
    pub const fn flip(self) -> Self {
        Square(63 - self.0)
    }

    /// Offset by a (row, col) delta, None if off the board
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

/// Perspective-local notation: columns a-h, rows printed as ranks 8-1.
/// Only meaningful relative to the current orientation of the grid.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = b'a' + self.col();
        let rank = b'8' - self.row();
        write!(f, "{}{}", file as char, rank as char)
    }
}

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Get opposite color
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Home column of this side's king in its own perspective.
    ///
    /// The flip mirrors columns, so the two kings do not share a
    /// self-relative home column: e1 reads as column 4 for White while
    /// e8 reads as column 3 for Black.
    #[inline]
    pub const fn king_home_col(self) -> u8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }
}

/// Piece kinds (6 kinds)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

/// Number of piece kinds
pub const NUM_PIECE_KINDS: usize = 6;

impl PieceKind {
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 510,
            PieceKind::Queen => 975,
            PieceKind::King => 0, // King has special handling
        }
    }
}

/// Piece on the board
///
/// `has_moved` only matters for castling eligibility (king and rook) but
/// is carried uniformly to keep the representation a single value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    /// Create new piece that has not moved yet
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Copy of this piece with `has_moved` set
    #[inline]
    pub const fn moved(self) -> Self {
        Piece {
            has_moved: true,
            ..self
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let k = match self.kind {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };
        write!(f, "{c}{k}")
    }
}

/// En passant target with its two-ply lifecycle.
///
/// A double step records the square behind the pawn, already expressed in
/// the opponent's (post-flip) coordinates, unarmed. The next move
/// application arms it, making it capturable for exactly that reply ply;
/// the application after that clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnPassant {
    pub square: Square,
    pub armed: bool,
}

/// Complete game state, always expressed from the mover's perspective.
///
/// Positions are cloned before mutation; a position handed to a caller is
/// never observed to change underneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    grid: [[Option<Piece>; 8]; 8],
    pub side_to_move: Color,
    pub en_passant: Option<EnPassant>,
    /// Moves since the last capture or pawn advance
    pub stall_clock: u8,
    /// Each king's square in its own color's perspective, invariant
    /// under `flip`. Maintained incrementally when a king moves.
    king_positions: [Square; 2],
}

impl Position {
    /// Standard starting position, White to move
    pub fn startpos() -> Self {
        use PieceKind::*;

        let mut grid: [[Option<Piece>; 8]; 8] = [[None; 8]; 8];
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (col, &kind) in back_rank.iter().enumerate() {
            grid[0][col] = Some(Piece::new(kind, Color::Black));
            grid[7][col] = Some(Piece::new(kind, Color::White));
        }
        for col in 0..8 {
            grid[1][col] = Some(Piece::new(Pawn, Color::Black));
            grid[6][col] = Some(Piece::new(Pawn, Color::White));
        }

        Position {
            grid,
            side_to_move: Color::White,
            en_passant: None,
            stall_clock: 0,
            king_positions: [Square::new(7, 4), Square::new(7, 3)],
        }
    }

    /// Empty board for constructing test positions. Kings must be placed
    /// with [`Position::put_piece`] before the position is used.
    pub fn empty(side_to_move: Color) -> Self {
        Position {
            grid: [[None; 8]; 8],
            side_to_move,
            en_passant: None,
            stall_clock: 0,
            king_positions: [Square::new(7, 4), Square::new(7, 3)],
        }
    }

    /// Get the piece at a square
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    /// Set or clear the piece at a square
    #[inline]
    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Place a piece, keeping the king tracker consistent. `sq` is in the
    /// current perspective; an enemy king is stored flipped into its own
    /// color's frame.
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.set_piece(sq, Some(piece));
        if piece.kind == PieceKind::King {
            let own_frame = if piece.color == self.side_to_move {
                sq
            } else {
                sq.flip()
            };
            self.king_positions[piece.color.index()] = own_frame;
        }
    }

    /// Square of the mover's king, in the current perspective
    #[inline]
    pub fn own_king_square(&self) -> Square {
        self.king_positions[self.side_to_move.index()]
    }

    /// Record a new square for the mover's king
    #[inline]
    pub(crate) fn set_own_king_square(&mut self, sq: Square) {
        self.king_positions[self.side_to_move.index()] = sq;
    }

    /// Rotate the grid 180 degrees and hand the turn to the opponent.
    ///
    /// Called exactly once per applied half-move. King positions are kept
    /// in each color's own frame and the en passant target is recorded
    /// pre-flipped, so neither needs adjusting here.
    pub fn flip(&mut self) {
        let mut rotated: [[Option<Piece>; 8]; 8] = [[None; 8]; 8];
        for row in 0..8 {
            for col in 0..8 {
                rotated[7 - row][7 - col] = self.grid[row][col];
            }
        }
        self.grid = rotated;
        self.side_to_move = self.side_to_move.opposite();
    }

    /// Material balance in centipawns, own pieces minus enemy pieces
    pub fn material_balance(&self) -> i32 {
        let mut total = 0;
        for row in &self.grid {
            for piece in row.iter().flatten() {
                if piece.color == self.side_to_move {
                    total += piece.kind.value();
                } else {
                    total -= piece.kind.value();
                }
            }
        }
        total
    }

    /// Total non-king material on the board, both sides. Drives the
    /// middlegame/endgame switch in evaluation.
    pub fn total_material(&self) -> i32 {
        let mut total = 0;
        for row in &self.grid {
            for piece in row.iter().flatten() {
                total += piece.kind.value();
            }
        }
        total
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for cell in row {
                match cell {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, "-- ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
