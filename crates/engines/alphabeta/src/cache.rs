//! Bounded cache of static evaluations.

use std::mem;

use crate::eval::Score;

/// Largest table a cache will allocate, in slots.
pub const MAX_CAPACITY: usize = 1 << 22;

const MEGABYTE: usize = 1 << 20;

/// What a cached score depends on besides the board itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Canonical position hash
    pub hash: u64,
    /// Depth remaining when the score was requested
    pub depth: u8,
    /// Whether the position repeated an earlier one in the game history
    pub repeated: bool,
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    key: CacheKey,
    score: Score,
}

/// Fixed-size slot table. A store always replaces whatever occupied the slot, and a
/// probe only hits when the full key matches.
#[derive(Debug, Clone)]
pub struct EvalCache {
    slots: Vec<Option<CacheEntry>>,
    mask: usize,
    used: usize,
    hits: u64,
    misses: u64,
}

impl EvalCache {
    /// Creates a cache with at least `capacity` slots (rounded up to a power of two),
    /// capped at [`MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let size = capacity.clamp(1, MAX_CAPACITY).next_power_of_two();
        Self {
            slots: vec![None; size],
            mask: size - 1,
            used: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Bytes taken by one slot.
    pub fn slot_size() -> usize {
        mem::size_of::<Option<CacheEntry>>()
    }

    /// The largest power-of-two slot count that fits in `megabytes`.
    pub fn slots_for_megabytes(megabytes: usize) -> usize {
        let slots = megabytes.saturating_mul(MEGABYTE) / Self::slot_size();
        let slots = slots.clamp(1, MAX_CAPACITY);
        1 << slots.ilog2()
    }

    /// Memory taken by `slots` slots, in whole megabytes (at least one).
    pub fn megabytes_for_slots(slots: usize) -> usize {
        (slots.saturating_mul(Self::slot_size()) / MEGABYTE).max(1)
    }

    pub fn probe(&mut self, key: CacheKey) -> Option<Score> {
        match self.slots[self.index(key)] {
            Some(entry) if entry.key == key => {
                self.hits += 1;
                Some(entry.score)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, key: CacheKey, score: Score) {
        let index = self.index(key);
        if self.slots[index].is_none() {
            self.used += 1;
        }
        self.slots[index] = Some(CacheEntry { key, score });
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.used = 0;
        self.hits = 0;
        self.misses = 0;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    fn index(&self, key: CacheKey) -> usize {
        // Zobrist keys are already uniform; fold the context in so the depths of one
        // position land in different slots.
        let context = ((key.depth as u64) << 1) | key.repeated as u64;
        let salt = context.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        ((key.hash ^ salt) as usize) & self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hash: u64, depth: u8) -> CacheKey {
        CacheKey {
            hash,
            depth,
            repeated: false,
        }
    }

    #[test]
    fn test_capacity_rounds_up() {
        assert_eq!(EvalCache::new(1000).capacity(), 1024);
        assert_eq!(EvalCache::new(0).capacity(), 1);
    }

    #[test]
    fn test_capacity_is_capped() {
        assert_eq!(EvalCache::new(usize::MAX).capacity(), MAX_CAPACITY);
        assert_eq!(EvalCache::new(MAX_CAPACITY + 1).capacity(), MAX_CAPACITY);
    }

    #[test]
    fn test_megabyte_conversions() {
        let slots = EvalCache::slots_for_megabytes(16);
        assert!(slots.is_power_of_two());
        assert!(slots * EvalCache::slot_size() <= 16 * MEGABYTE);
        assert!(2 * slots * EvalCache::slot_size() > 16 * MEGABYTE);

        assert_eq!(EvalCache::slots_for_megabytes(0), 1);
        assert_eq!(EvalCache::slots_for_megabytes(usize::MAX), MAX_CAPACITY);
        assert_eq!(EvalCache::megabytes_for_slots(1), 1);
        assert_eq!(EvalCache::megabytes_for_slots(1 << 20), EvalCache::slot_size());
    }

    #[test]
    fn test_store_and_probe() {
        let mut cache = EvalCache::new(64);
        assert!(cache.is_empty());
        cache.store(key(42, 3), 125);
        assert_eq!(cache.probe(key(42, 3)), Some(125));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_context_is_part_of_the_key() {
        let mut cache = EvalCache::new(64);
        cache.store(key(42, 3), 125);
        assert_eq!(cache.probe(key(42, 2)), None);
        assert_eq!(
            cache.probe(CacheKey {
                repeated: true,
                ..key(42, 3)
            }),
            None
        );
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_collisions_replace() {
        // A single slot: every key maps to it.
        let mut cache = EvalCache::new(1);
        cache.store(key(1, 0), 10);
        cache.store(key(2, 0), 20);
        assert_eq!(cache.probe(key(1, 0)), None);
        assert_eq!(cache.probe(key(2, 0)), Some(20));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = EvalCache::new(16);
        cache.store(key(7, 1), -40);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.probe(key(7, 1)), None);
    }
}
