//! Internal structures shared by the store operations

use std::sync::atomic::{AtomicU64, Ordering};

/// Internal store statistics with atomic counters
#[derive(Debug, Default)]
pub struct StoreCounters {
    pub memory_hits: AtomicU64,
    pub disk_reads: AtomicU64,
    pub misses: AtomicU64,
    pub writes: AtomicU64,
    pub bytes_written: AtomicU64,
    pub erases: AtomicU64,
    pub errors: AtomicU64,
}

impl StoreCounters {
    pub fn record_memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disk_read(&self) {
        self.disk_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self, size: u64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(size, Ordering::Relaxed);
    }

    pub fn record_erase(&self) {
        self.erases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of store statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Reads served from the memory tier
    pub memory_hits: u64,
    /// Reads served from disk
    pub disk_reads: u64,
    /// Reads of absent entries
    pub misses: u64,
    pub writes: u64,
    pub bytes_written: u64,
    pub erases: u64,
    /// I/O failures across all operations
    pub errors: u64,
    /// Values dropped from memory to stay within budget
    pub evictions: u64,
    pub resident_bytes: u64,
    pub resident_entries: usize,
    pub memory_budget: u64,
}

impl StoreStats {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.disk_reads;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
