//! Position fingerprinting for the transposition table
//!
//! Random keys XORed over piece placement, side to move and en passant
//! state. History (castling rights, repetition) is deliberately not part
//! of the fingerprint. Keys come from a deterministically seeded
//! xoshiro generator so fingerprints are stable across runs.

use once_cell::sync::Lazy;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::{Color, Position, Square, NUM_PIECE_KINDS};

/// Fixed seed for reproducible fingerprints
const ZOBRIST_SEED: u64 = 0x5EED_CAFE_F00D_D00D;

/// Random key material for fingerprinting
pub struct ZobristKeys {
    pieces: [[[u64; 64]; NUM_PIECE_KINDS]; 2],
    side_black: u64,
    en_passant: [u64; 64],
    en_passant_armed: u64,
}

/// Global key table, initialized on first use
pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(ZOBRIST_SEED);

    let mut pieces = [[[0u64; 64]; NUM_PIECE_KINDS]; 2];
    for color in &mut pieces {
        for kind in color.iter_mut() {
            for key in kind.iter_mut() {
                *key = rng.next_u64();
            }
        }
    }

    let mut en_passant = [0u64; 64];
    for key in &mut en_passant {
        *key = rng.next_u64();
    }

    ZobristKeys {
        pieces,
        side_black: rng.next_u64(),
        en_passant,
        en_passant_armed: rng.next_u64(),
    }
});

/// Fingerprint of a position over placement, side to move and en
/// passant state. Computed fresh per lookup; the grid is small enough
/// that incremental maintenance is not worth the bookkeeping.
pub fn fingerprint(pos: &Position) -> u64 {
    let keys = &*ZOBRIST;
    let mut hash = 0u64;

    for row in 0..8 {
        for col in 0..8 {
            let sq = Square::new(row, col);
            if let Some(piece) = pos.piece_at(sq) {
                hash ^= keys.pieces[piece.color.index()][piece.kind.as_index()][sq.index()];
            }
        }
    }

    if pos.side_to_move == Color::Black {
        hash ^= keys.side_black;
    }

    if let Some(ep) = pos.en_passant {
        hash ^= keys.en_passant[ep.square.index()];
        if ep.armed {
            hash ^= keys.en_passant_armed;
        }
    }

    hash
}
