//! Disk-backed implementation of the cache traits
//!
//! [`DiskCache`] hashes every caller key into a [`StorageKey`] and hands the
//! work to a shared [`BlobStore`]. It keeps no state of its own.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

use crate::config::CacheConfig;
use crate::core::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;
use crate::streaming::{BlobReader, CacheSink, StreamingCache};
use crate::traits::Cache;

/// Cache facade over a [`BlobStore`]
#[derive(Debug, Clone)]
pub struct DiskCache {
    store: BlobStore,
}

impl DiskCache {
    /// Create a cache storing files under `base_dir`, keeping up to
    /// `memory_budget_bytes` of recently used values in memory
    pub async fn new(base_dir: impl Into<PathBuf>, memory_budget_bytes: u64) -> Result<Self> {
        match BlobStore::new(base_dir, memory_budget_bytes).await {
            Ok(store) => Ok(Self::with_store(store)),
            Err(e) => Err(e),
        }
    }

    /// Create a cache from a full configuration
    pub async fn open(config: CacheConfig) -> Result<Self> {
        match BlobStore::open(config).await {
            Ok(store) => Ok(Self::with_store(store)),
            Err(e) => Err(e),
        }
    }

    /// Wrap an already configured store
    pub fn with_store(store: BlobStore) -> Self {
        Self { store }
    }

    /// The underlying store, for callers that need errors reported
    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    pub fn into_store(self) -> BlobStore {
        self.store
    }
}

/// Log a failure the facade is about to swallow. Absence is expected and
/// stays quiet.
fn log_swallowed(operation: &'static str, key: &StorageKey, error: &CacheError) {
    if error.is_not_found() {
        tracing::trace!(key = %key, operation, "cache miss");
    } else {
        tracing::warn!(key = %key, operation, error = %error, "cache operation failed");
    }
}

#[async_trait]
impl Cache for DiskCache {
    async fn get(&self, key: &str) -> Option<Bytes> {
        let storage_key = StorageKey::for_key(key);
        match self.store.read(&storage_key).await {
            Ok(value) => Some(value),
            Err(e) => {
                log_swallowed("get", &storage_key, &e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8]) {
        let storage_key = StorageKey::for_key(key);
        if let Err(e) = self.store.write(&storage_key, value, true).await {
            log_swallowed("set", &storage_key, &e);
        }
    }

    async fn delete(&self, key: &str) {
        let storage_key = StorageKey::for_key(key);
        if let Err(e) = self.store.erase(&storage_key).await {
            log_swallowed("delete", &storage_key, &e);
        }
    }
}

#[async_trait]
impl StreamingCache for DiskCache {
    async fn get_reader(&self, key: &str) -> Option<BlobReader> {
        let storage_key = StorageKey::for_key(key);
        match self.store.read_stream(&storage_key).await {
            Ok(reader) => Some(reader),
            Err(e) => {
                log_swallowed("get_reader", &storage_key, &e);
                None
            }
        }
    }

    async fn get_writer(&self, key: &str) -> CacheSink {
        let storage_key = StorageKey::for_key(key);
        let capacity = self.store.config().pipe_capacity;
        let (sink, source) = CacheSink::pipe(storage_key.clone(), capacity);

        self.store.spawn_write_stream(storage_key, source, true);

        sink
    }
}

#[cfg(test)]
mod tests;
