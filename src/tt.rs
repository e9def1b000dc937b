//! Fixed-size transposition table.
//!
//! Direct-mapped: `2^N` single-entry slots indexed by `key & (2^N - 1)`, no
//! chaining. A slot hit requires the full 64-bit key to match, which makes
//! index collisions benign: a colliding position simply competes for the slot
//! under the replacement policy. Key 0 is reserved as "empty"; a real Zobrist
//! key of 0 is an accepted, astronomically unlikely limitation.
//!
//! Quiescence entries are stored with negative depth (deeper quiescence =
//! more negative), so they can never evict a full-width entry of a different
//! position.

use crate::board::Move;

/// Default table size; `SearchState::new` uses this.
pub const DEFAULT_TT_MB: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoundType {
    /// The score is exact for the stored depth.
    Exact,
    /// A beta cutoff happened: the true score is at least `eval`.
    LowerBound,
    /// Alpha was never raised: the true score is at most `eval`.
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
struct TTEntry {
    key: u64,
    depth: i32,
    eval: i32,
    bound: BoundType,
    best_move: Option<Move>,
    age: u16,
}

impl TTEntry {
    const EMPTY: TTEntry = TTEntry {
        key: 0,
        depth: 0,
        eval: 0,
        bound: BoundType::Exact,
        best_move: None,
        age: 0,
    };
}

/// Diagnostics counters; never consulted by correctness-affecting logic.
#[derive(Clone, Copy, Debug, Default)]
pub struct TTStats {
    pub lookups: u64,
    pub hits: u64,
    pub stores: u64,
    pub overwrites: u64,
}

/// Result of a probe. The cached move is usable for ordering on any exact-key
/// match; the score is populated only when depth and bound make it
/// trustworthy, and a `Some` score means the caller can return it directly.
#[derive(Clone, Copy, Debug)]
pub struct TTProbe {
    pub score: Option<i32>,
    pub best_move: Option<Move>,
}

impl TTProbe {
    const MISS: TTProbe = TTProbe {
        score: None,
        best_move: None,
    };
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: usize,
    age: u16,
    stats: TTStats,
}

impl TranspositionTable {
    /// Allocates the largest power-of-two entry count fitting `size_mb`.
    /// The backing array is allocated once and reused for the whole game.
    pub fn new(size_mb: usize) -> TranspositionTable {
        let budget = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<TTEntry>();
        let mut count = 1usize;
        while count * 2 * entry_size <= budget {
            count *= 2;
        }
        TranspositionTable {
            entries: vec![TTEntry::EMPTY; count],
            mask: count - 1,
            age: 0,
            stats: TTStats::default(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Bumps the age generation; called once per top-level search.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    /// Zeroes every slot and resets the age and counters.
    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::EMPTY);
        self.age = 0;
        self.stats = TTStats::default();
    }

    pub fn probe(&mut self, key: u64, depth: i32, alpha: i32, beta: i32) -> TTProbe {
        self.stats.lookups += 1;
        let entry = self.entries[(key as usize) & self.mask];
        if entry.key != key {
            return TTProbe::MISS;
        }
        self.stats.hits += 1;

        let mut score = None;
        if entry.depth >= depth {
            score = match entry.bound {
                BoundType::Exact => Some(entry.eval),
                BoundType::LowerBound if entry.eval >= beta => Some(entry.eval),
                BoundType::UpperBound if entry.eval <= alpha => Some(entry.eval),
                _ => None,
            };
        }
        TTProbe {
            score,
            best_move: entry.best_move,
        }
    }

    /// Ordering-move lookup without depth/bound semantics or stats noise.
    /// Used for principal-variation extraction.
    pub fn probe_move(&self, key: u64) -> Option<Move> {
        let entry = &self.entries[(key as usize) & self.mask];
        if entry.key == key {
            entry.best_move
        } else {
            None
        }
    }

    pub fn store(
        &mut self,
        key: u64,
        depth: i32,
        eval: i32,
        bound: BoundType,
        best_move: Option<Move>,
    ) {
        let idx = (key as usize) & self.mask;
        let old = self.entries[idx];
        let new = TTEntry {
            key,
            depth,
            eval,
            bound,
            best_move,
            age: self.age,
        };

        if old.key == 0 {
            self.stats.stores += 1;
            self.entries[idx] = new;
            return;
        }

        if old.key == key {
            if depth >= old.depth {
                self.stats.stores += 1;
                self.entries[idx] = TTEntry {
                    // A deeper search with no move keeps the old ordering hint.
                    best_move: best_move.or(old.best_move),
                    ..new
                };
            } else if best_move.is_some() {
                // Shallower result: keep the entry, refresh the move anyway.
                self.entries[idx].best_move = best_move;
            }
            return;
        }

        // Different position in the slot. Quiescence data never evicts a
        // full-width entry; otherwise depth wins, discounted by how stale the
        // incumbent is.
        if depth < 0 && old.depth >= 0 {
            return;
        }
        let age_delta = self.age.wrapping_sub(old.age) as i32;
        if depth >= old.depth - age_delta {
            self.stats.stores += 1;
            self.stats.overwrites += 1;
            self.entries[idx] = new;
        }
    }

    /// Estimated fill ratio in thousandths, from a fixed-size sample.
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|e| e.key != 0)
            .count();
        (used * 1000 / sample) as u32
    }

    pub fn stats(&self) -> TTStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, Piece, Square};

    fn test_move(to: u8) -> Move {
        Move::new(Piece::Knight, Square(1), Square(to))
    }

    fn small_table() -> TranspositionTable {
        TranspositionTable::new(1)
    }

    #[test]
    fn sizes_to_a_power_of_two() {
        let tt = small_table();
        assert!(tt.entry_count().is_power_of_two());
        assert!(tt.entry_count() * std::mem::size_of::<TTEntry>() <= 1024 * 1024);
    }

    #[test]
    fn store_then_probe_round_trips() {
        let mut tt = small_table();
        tt.store(0xABCD, 5, 42, BoundType::Exact, Some(test_move(18)));
        let probe = tt.probe(0xABCD, 5, -100, 100);
        assert_eq!(probe.score, Some(42));
        assert_eq!(probe.best_move, Some(test_move(18)));
    }

    #[test]
    fn probe_requires_exact_key_match() {
        let mut tt = small_table();
        tt.store(0xABCD, 5, 42, BoundType::Exact, None);
        // Same slot, different key: an index collision is not a hit.
        let colliding = 0xABCD + tt.entry_count() as u64;
        let probe = tt.probe(colliding, 1, -100, 100);
        assert_eq!(probe.score, None);
        assert_eq!(probe.best_move, None);
    }

    #[test]
    fn shallow_entries_never_cut_deeper_requests() {
        let mut tt = small_table();
        tt.store(7, 3, 42, BoundType::Exact, Some(test_move(18)));
        let probe = tt.probe(7, 5, -100, 100);
        assert_eq!(probe.score, None);
        // The move is still usable for ordering.
        assert_eq!(probe.best_move, Some(test_move(18)));
    }

    #[test]
    fn bound_types_gate_the_score_on_the_window() {
        let mut tt = small_table();
        tt.store(7, 4, 80, BoundType::LowerBound, None);
        assert_eq!(tt.probe(7, 4, -100, 50).score, Some(80)); // eval >= beta
        assert_eq!(tt.probe(7, 4, -100, 100).score, None);

        tt.clear();
        tt.store(7, 4, -80, BoundType::UpperBound, None);
        assert_eq!(tt.probe(7, 4, -50, 100).score, Some(-80)); // eval <= alpha
        assert_eq!(tt.probe(7, 4, -100, 100).score, None);
    }

    #[test]
    fn same_key_deeper_replaces_shallower_does_not() {
        let mut tt = small_table();
        tt.store(7, 6, 10, BoundType::Exact, Some(test_move(16)));
        tt.store(7, 2, 99, BoundType::Exact, Some(test_move(18)));
        let probe = tt.probe(7, 2, -100, 100);
        // Score survives from the deeper search, move refreshed by the newer.
        assert_eq!(probe.score, Some(10));
        assert_eq!(probe.best_move, Some(test_move(18)));
    }

    #[test]
    fn quiescence_entries_do_not_evict_full_width_entries() {
        let mut tt = small_table();
        let key_a = 0x10;
        // Any key indexing the same slot.
        let key_b = key_a + tt.entry_count() as u64;
        tt.store(key_a, 4, 10, BoundType::Exact, None);
        tt.store(key_b, -2, 99, BoundType::Exact, None);
        assert_eq!(tt.probe(key_a, 4, -100, 100).score, Some(10));
        assert_eq!(tt.probe(key_b, -2, -100, 100).score, None);
    }

    #[test]
    fn aging_lets_new_shallow_entries_displace_stale_deep_ones() {
        let mut tt = small_table();
        let key_a = 0x10;
        let key_b = key_a + tt.entry_count() as u64;
        tt.store(key_a, 6, 10, BoundType::Exact, None);
        // Fresh generation, same age: depth 3 loses to depth 6.
        tt.store(key_b, 3, 20, BoundType::Exact, None);
        assert_eq!(tt.probe(key_a, 1, -100, 100).score, Some(10));
        // Four searches later the incumbent is stale enough to go.
        for _ in 0..4 {
            tt.new_search();
        }
        tt.store(key_b, 3, 20, BoundType::Exact, None);
        assert_eq!(tt.probe(key_b, 3, -100, 100).score, Some(20));
        assert_eq!(tt.probe(key_a, 1, -100, 100).score, None);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut tt = small_table();
        tt.store(7, 4, 10, BoundType::Exact, Some(test_move(18)));
        tt.clear();
        assert_eq!(tt.probe(7, 0, -100, 100).score, None);
        assert_eq!(tt.probe_move(7), None);
        assert_eq!(tt.hashfull_per_mille(), 0);
    }

    #[test]
    fn stats_track_lookups_and_hits() {
        let mut tt = small_table();
        tt.store(7, 4, 10, BoundType::Exact, None);
        tt.probe(7, 4, -100, 100);
        tt.probe(9, 4, -100, 100);
        let stats = tt.stats();
        assert_eq!(stats.lookups, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.stores, 1);
    }
}
