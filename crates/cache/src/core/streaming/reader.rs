//! Streaming read operations

use std::io::ErrorKind;
use std::sync::Arc;
use tokio::fs::File;

use crate::core::types::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;
use crate::streaming::{BlobReader, Siphon};

impl BlobStore {
    /// Open a lazily consumed stream over the value stored under `key`.
    ///
    /// Resident values are streamed from memory. Otherwise the stream reads
    /// the on-disk file incrementally, and if it is drained to the end and
    /// fits the memory budget the value becomes resident.
    pub async fn read_stream(&self, key: &StorageKey) -> Result<BlobReader> {
        if let Some(value) = self.inner.memory.get(key) {
            self.inner.stats.record_memory_hit();
            return Ok(BlobReader::from_memory(value));
        }

        self.open_disk_reader(key, true).await
    }

    /// Like [`BlobStore::read_stream`] but always reads from disk and never
    /// populates the memory tier
    pub async fn read_stream_direct(&self, key: &StorageKey) -> Result<BlobReader> {
        self.open_disk_reader(key, false).await
    }

    async fn open_disk_reader(&self, key: &StorageKey, fill_memory: bool) -> Result<BlobReader> {
        let generation = self.inner.memory.generation();
        let data_path = self.path_for(key);

        let file = match File::open(&data_path).await {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.inner.stats.record_miss();
                return Err(CacheError::not_found(key.as_str()));
            }
            Err(e) => {
                self.inner.stats.record_error();
                return Err(CacheError::io(&data_path, "open cache entry for streaming", e));
            }
        };

        // The open handle keeps reading this version even if the entry is
        // replaced while the stream is consumed
        let len = match file.metadata().await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.inner.stats.record_error();
                return Err(CacheError::io(&data_path, "stat cache entry", e));
            }
        };

        self.inner.stats.record_disk_read();

        let siphon = if fill_memory && self.inner.memory.admits(len) {
            Some(Siphon::new(
                key.clone(),
                Arc::clone(&self.inner.memory),
                generation,
                len,
            ))
        } else {
            None
        };

        tracing::trace!(key = %key, size = len, siphon = siphon.is_some(), "streaming from disk");
        Ok(BlobReader::from_file(file, len, siphon))
    }
}
