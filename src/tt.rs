//! Transposition table for caching search results
//!
//! Fixed-size, power-of-two table of 16-byte packed entries. Atomics
//! keep entry reads and writes tear-free; the table itself is private to
//! one searcher and is not meant to be shared across threads.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::moves::Move;

/// Bound type of a stored score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    /// Exact score (PV node)
    Exact = 0,
    /// Score is at least this (fail-high node)
    Lower = 1,
    /// Score is at most this (fail-low node)
    Upper = 2,
}

/// Transposition table entry
///
/// Packed into 16 bytes:
/// - 8 bytes: key (high 48 bits of the fingerprint)
/// - 2 bytes: best move
/// - 2 bytes: score
/// - 1 byte: depth
/// - 1 byte: bound type and age
#[derive(Clone, Copy)]
pub struct TTEntry {
    key: u64,
    data: u64,
}

impl TTEntry {
    fn new(key: u64, mv: Option<Move>, score: i16, depth: u8, bound: Bound, age: u8) -> Self {
        // Low 16 bits of the key are the table index; keep the high bits
        let key = key & 0xFFFF_FFFF_FFFF_0000;

        let move_data = match mv {
            Some(m) => m.to_u16(),
            None => 0,
        };

        // [63-48]: move, [47-32]: score, [31-24]: depth,
        // [23-22]: bound, [21-16]: age
        let data = ((move_data as u64) << 48)
            | ((score as u16 as u64) << 32)
            | ((depth as u64) << 24)
            | ((bound as u64) << 22)
            | (((age & 0x3F) as u64) << 16);

        TTEntry { key, data }
    }

    #[inline]
    fn matches(&self, key: u64) -> bool {
        (self.key & 0xFFFF_FFFF_FFFF_0000) == (key & 0xFFFF_FFFF_FFFF_0000)
    }

    /// Best move found at this node, if any was stored
    pub fn best_move(&self) -> Option<Move> {
        let move_data = ((self.data >> 48) & 0xFFFF) as u16;
        if move_data == 0 {
            None
        } else {
            Some(Move::from_u16(move_data))
        }
    }

    /// Stored score
    #[inline]
    pub fn score(&self) -> i16 {
        ((self.data >> 32) & 0xFFFF) as i16
    }

    /// Depth the score was computed at
    #[inline]
    pub fn depth(&self) -> u8 {
        ((self.data >> 24) & 0xFF) as u8
    }

    /// Bound type of the stored score
    #[inline]
    pub fn bound(&self) -> Bound {
        match (self.data >> 22) & 0x3 {
            0 => Bound::Exact,
            1 => Bound::Lower,
            _ => Bound::Upper,
        }
    }

    #[inline]
    fn age(&self) -> u8 {
        ((self.data >> 16) & 0x3F) as u8
    }
}

/// Transposition table, one per searcher
pub struct TranspositionTable {
    /// Two AtomicU64 per entry (key, data)
    table: Vec<AtomicU64>,
    size: usize,
    age: u8,
}

impl TranspositionTable {
    /// Create a table with the given size in MB
    pub fn new(size_mb: usize) -> Self {
        let entry_size = 16;
        let size = (size_mb * 1024 * 1024) / entry_size;

        // Power of two for mask indexing
        let size = size.next_power_of_two() / 2;
        let size = size.max(1);

        let mut table = Vec::with_capacity(size * 2);
        for _ in 0..size * 2 {
            table.push(AtomicU64::new(0));
        }

        TranspositionTable {
            table,
            size,
            age: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & (self.size - 1)
    }

    /// Look up an entry by fingerprint
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let base = self.index(hash) * 2;
        let entry = TTEntry {
            key: self.table[base].load(Ordering::Relaxed),
            data: self.table[base + 1].load(Ordering::Relaxed),
        };

        if entry.matches(hash) && entry.depth() > 0 {
            Some(entry)
        } else {
            None
        }
    }

    /// Store a search result.
    ///
    /// Replacement: always take over empty slots and foreign positions;
    /// for the same position prefer entries from the current search
    /// generation, then greater depth.
    pub fn store(&self, hash: u64, mv: Option<Move>, score: i16, depth: u8, bound: Bound) {
        let base = self.index(hash) * 2;
        let entry = TTEntry::new(hash, mv, score, depth, bound, self.age);

        let old = TTEntry {
            key: self.table[base].load(Ordering::Relaxed),
            data: self.table[base + 1].load(Ordering::Relaxed),
        };

        let should_replace = !old.matches(hash)
            || old.depth() == 0
            || old.age() != self.age
            || depth >= old.depth();

        if should_replace {
            self.table[base].store(entry.key, Ordering::Relaxed);
            self.table[base + 1].store(entry.data, Ordering::Relaxed);
        }
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        for cell in &self.table {
            cell.store(0, Ordering::Relaxed);
        }
        self.age = 0;
    }

    /// Advance the generation counter for age-based replacement
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1) & 0x3F;
    }
}
