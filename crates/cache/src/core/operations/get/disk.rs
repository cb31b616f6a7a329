//! Disk loading for reads

use bytes::Bytes;
use std::io::ErrorKind;
use tokio::fs;

use crate::core::types::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;

impl BlobStore {
    pub(super) async fn load_from_disk(&self, key: &StorageKey) -> Result<Bytes> {
        // Taken before touching disk so a write landing mid-read keeps the
        // value we read out of the tier
        let generation = self.inner.memory.generation();
        let data_path = self.path_for(key);

        let data = match fs::read(&data_path).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.inner.stats.record_miss();
                return Err(CacheError::not_found(key.as_str()));
            }
            Err(e) => {
                self.inner.stats.record_error();
                return Err(CacheError::io(&data_path, "read cache entry", e));
            }
        };

        self.inner.stats.record_disk_read();

        let resident = self
            .inner
            .memory
            .insert_if_current(key.clone(), data.clone(), generation);
        tracing::trace!(key = %key, size = data.len(), resident, "read from disk");

        Ok(data)
    }
}
