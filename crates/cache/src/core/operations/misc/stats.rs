//! Store statistics

use std::sync::atomic::Ordering;

use crate::core::internal::StoreStats;
use crate::core::types::BlobStore;

impl BlobStore {
    /// Snapshot of the store counters and memory tier occupancy
    pub fn stats(&self) -> StoreStats {
        let counters = &self.inner.stats;
        let memory = &self.inner.memory;

        StoreStats {
            memory_hits: counters.memory_hits.load(Ordering::Relaxed),
            disk_reads: counters.disk_reads.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            writes: counters.writes.load(Ordering::Relaxed),
            bytes_written: counters.bytes_written.load(Ordering::Relaxed),
            erases: counters.erases.load(Ordering::Relaxed),
            errors: counters.errors.load(Ordering::Relaxed),
            evictions: memory.evictions(),
            resident_bytes: memory.resident_bytes(),
            resident_entries: memory.resident_entries(),
            memory_budget: memory.budget(),
        }
    }
}
