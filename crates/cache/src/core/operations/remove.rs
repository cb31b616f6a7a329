//! Store erase operations

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use super::super::types::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;

impl BlobStore {
    /// Delete the entry stored under `key`.
    ///
    /// Fails with `NotFound` when there is nothing to delete; callers that
    /// treat deletion as idempotent can ignore that variant.
    pub async fn erase(&self, key: &StorageKey) -> Result<()> {
        let data_path = self.path_for(key);
        let removed = fs::remove_file(&data_path).await;

        // Only once the file is gone: a fill that read it before this point
        // is then discarded
        self.inner.memory.invalidate(key);

        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CacheError::not_found(key.as_str()));
            }
            Err(e) => {
                self.inner.stats.record_error();
                return Err(CacheError::io(&data_path, "remove cache entry", e));
            }
        }

        self.inner.stats.record_erase();
        self.prune_empty_shards(&data_path).await;

        tracing::debug!(key = %key, "erased cache entry");
        Ok(())
    }

    /// Remove shard directories left empty by an erase, stopping at the
    /// base directory or the first directory that still has children
    async fn prune_empty_shards(&self, data_path: &Path) {
        let base_dir = &self.inner.base_dir;
        let mut current = data_path.parent();

        while let Some(dir) = current {
            if dir == base_dir.as_path() || !dir.starts_with(base_dir) {
                break;
            }

            // remove_dir refuses non-empty directories
            if fs::remove_dir(dir).await.is_err() {
                break;
            }

            current = dir.parent();
        }
    }
}
