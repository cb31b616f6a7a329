//! Store read operations

mod disk;

use bytes::Bytes;
use tokio::fs;

use crate::core::types::BlobStore;
use crate::errors::Result;
use crate::keys::StorageKey;

impl BlobStore {
    /// Read the full value stored under `key`.
    ///
    /// Served from the memory tier when resident, otherwise from disk. Fails
    /// with `NotFound` when no entry exists.
    pub async fn read(&self, key: &StorageKey) -> Result<Bytes> {
        if let Some(value) = self.inner.memory.get(key) {
            self.inner.stats.record_memory_hit();
            tracing::trace!(key = %key, size = value.len(), "memory tier hit");
            return Ok(value);
        }

        self.load_from_disk(key).await
    }

    /// Whether an entry exists for `key`
    pub async fn has(&self, key: &StorageKey) -> bool {
        if self.inner.memory.contains(key) {
            return true;
        }

        match fs::metadata(self.path_for(key)).await {
            Ok(metadata) => metadata.is_file(),
            Err(_) => false,
        }
    }
}
