//! Byte-budgeted LRU tier

use crate::keys::StorageKey;
use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keys whose invalidation is tracked individually. Past this the record
/// is folded into the floor, which rejects every older fill.
pub(super) const MAX_TRACKED_INVALIDATIONS: usize = 4096;

/// Bounded LRU cache of resident values, weighted by value length
pub struct MemoryTier {
    state: Mutex<TierState>,
    /// Maximum bytes resident at once
    budget: u64,
    evictions: AtomicU64,
}

struct TierState {
    entries: LruCache<StorageKey, Bytes>,
    used: u64,
    /// Bumped on every invalidation
    generation: u64,
    /// Generation at which each key was last invalidated. A fill that
    /// started before that generation is discarded, so a stale disk read
    /// cannot resurrect an old value.
    invalidated: HashMap<StorageKey, u64>,
    /// Fills started before this generation are discarded for every key
    floor: u64,
}

impl TierState {
    fn is_current(&self, key: &StorageKey, generation: u64) -> bool {
        generation >= self.floor
            && self
                .invalidated
                .get(key)
                .map_or(true, |&at| generation >= at)
    }
}

impl MemoryTier {
    pub fn new(budget: u64) -> Self {
        Self {
            state: Mutex::new(TierState {
                entries: LruCache::unbounded(),
                used: 0,
                generation: 0,
                invalidated: HashMap::new(),
                floor: 0,
            }),
            budget,
            evictions: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Whether a value of `size` bytes could ever be resident
    #[inline]
    pub fn admits(&self, size: u64) -> bool {
        self.budget > 0 && size <= self.budget
    }

    /// Look up a resident value, marking it most recently used
    pub fn get(&self, key: &StorageKey) -> Option<Bytes> {
        self.state.lock().entries.get(key).cloned()
    }

    /// Look up without touching recency
    pub fn contains(&self, key: &StorageKey) -> bool {
        self.state.lock().entries.contains(key)
    }

    /// Generation to hand back to [`MemoryTier::insert_if_current`]. Take it
    /// before reading the value from disk.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Make `value` resident. Returns false when it does not fit the budget.
    pub fn insert(&self, key: StorageKey, value: Bytes) -> bool {
        let mut state = self.state.lock();
        self.insert_locked(&mut state, key, value)
    }

    /// Make `value` resident only if `key` was not invalidated since
    /// `generation`
    pub fn insert_if_current(&self, key: StorageKey, value: Bytes, generation: u64) -> bool {
        let mut state = self.state.lock();
        if !state.is_current(&key, generation) {
            return false;
        }
        self.insert_locked(&mut state, key, value)
    }

    /// Drop the resident copy of `key`, if any
    pub fn invalidate(&self, key: &StorageKey) {
        let mut state = self.state.lock();
        state.generation += 1;
        let generation = state.generation;

        if state.invalidated.len() >= MAX_TRACKED_INVALIDATIONS
            && !state.invalidated.contains_key(key)
        {
            state.invalidated.clear();
            state.floor = generation;
        } else {
            state.invalidated.insert(key.clone(), generation);
        }

        if let Some(old) = state.entries.pop(key) {
            state.used -= old.len() as u64;
        }
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.floor = state.generation;
        state.invalidated.clear();
        state.entries.clear();
        state.used = 0;
    }

    pub fn resident_bytes(&self) -> u64 {
        self.state.lock().used
    }

    pub fn resident_entries(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(super) fn tracked_invalidations(&self) -> usize {
        self.state.lock().invalidated.len()
    }

    fn insert_locked(&self, state: &mut TierState, key: StorageKey, value: Bytes) -> bool {
        let size = value.len() as u64;
        if !self.admits(size) {
            return false;
        }

        if let Some(old) = state.entries.pop(&key) {
            state.used -= old.len() as u64;
        }

        while state.used + size > self.budget {
            match state.entries.pop_lru() {
                Some((evicted_key, evicted)) => {
                    state.used -= evicted.len() as u64;
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(key = %evicted_key, size = evicted.len(), "evicted from memory tier");
                }
                None => break,
            }
        }

        state.entries.put(key, value);
        state.used += size;
        true
    }
}

impl std::fmt::Debug for MemoryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryTier")
            .field("budget", &self.budget)
            .field("used", &state.used)
            .field("entries", &state.entries.len())
            .finish()
    }
}
