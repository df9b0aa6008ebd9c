//! Move representation and move lists
//!
//! A move is an ordered (start, end) square pair packed into 16 bits.
//! Promotion is implicit: any pawn reaching row 0 becomes a queen.

use smallvec::SmallVec;

use crate::board::Square;

/// Move representation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Encoded move data:
    /// - bits 0-5: destination square (0-63)
    /// - bits 6-11: source square (0-63)
    data: u16,
}

impl Move {
    /// Null move constant (no square pair moves a piece onto itself)
    pub const NULL: Self = Move { data: 0 };

    /// Create a move from start and end squares
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        debug_assert!(from.0 < 64 && to.0 < 64);
        Move {
            data: to.0 as u16 | ((from.0 as u16) << 6),
        }
    }

    /// Check if this is the null move
    #[inline]
    pub const fn is_null(self) -> bool {
        self.data == 0
    }

    /// Get source square
    #[inline]
    pub const fn from(self) -> Square {
        Square(((self.data >> 6) & 0x3F) as u8)
    }

    /// Get destination square
    #[inline]
    pub const fn to(self) -> Square {
        Square((self.data & 0x3F) as u8)
    }

    /// Convert to u16 for compact storage
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self.data
    }

    /// Create from u16
    #[inline]
    pub const fn from_u16(data: u16) -> Self {
        Move { data }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}{}", self.from(), self.to())
        }
    }
}

/// List of moves, inline up to a typical branching factor
#[derive(Clone, Debug, Default)]
pub struct MoveList {
    moves: SmallVec<[Move; 64]>,
}

impl MoveList {
    /// Create new empty move list
    pub fn new() -> Self {
        MoveList {
            moves: SmallVec::new(),
        }
    }

    /// Add a move to the list
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Get number of moves
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Get slice of moves
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Get mutable slice of moves, for in-place ordering
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    /// Check if the list contains a move
    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.moves.contains(&m)
    }

    /// Move a specific entry to the front, preserving the order of the
    /// rest. Used to try the transposition table move first.
    pub fn promote_to_front(&mut self, m: Move) {
        if let Some(idx) = self.moves.iter().position(|&x| x == m) {
            self.moves[..=idx].rotate_right(1);
        }
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = smallvec::IntoIter<[Move; 64]>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
