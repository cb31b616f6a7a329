//! Store write operations

mod disk;

use tokio::io::AsyncRead;

use crate::core::types::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;

impl BlobStore {
    /// Persist `data` under `key`.
    ///
    /// Readers see either the previous value or all of `data`, never a
    /// prefix. With `overwrite = false` an existing entry makes this fail
    /// with `AlreadyExists` and stays untouched.
    pub async fn write(&self, key: &StorageKey, data: &[u8], overwrite: bool) -> Result<()> {
        match self.write_stream(key, data, overwrite).await {
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Persist everything `reader` yields under `key`, returning the number
    /// of bytes written.
    ///
    /// The stream is copied to disk as it is consumed; the value is never
    /// buffered whole. Atomicity matches [`BlobStore::write`]: the entry only
    /// becomes visible once the stream hit end-of-file and the data is
    /// flushed.
    pub async fn write_stream<R>(
        &self,
        key: &StorageKey,
        mut reader: R,
        overwrite: bool,
    ) -> Result<u64>
    where
        R: AsyncRead + Unpin + Send,
    {
        let final_path = self.path_for(key);

        // Cheap early exit; the commit below is what actually guarantees
        // no-clobber semantics
        if !overwrite && self.has(key).await {
            return Err(CacheError::already_exists(key.as_str()));
        }

        let (temp_path, file) = match self.create_temp_file(&final_path).await {
            Ok(created) => created,
            Err(e) => {
                self.inner.stats.record_error();
                return Err(e);
            }
        };

        let written = match self.stream_to_temp(&temp_path, file, &mut reader).await {
            Ok(n) => n,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                self.inner.stats.record_error();
                return Err(e);
            }
        };

        match self.commit(key, &temp_path, &final_path, overwrite).await {
            Ok(()) => {}
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                if !e.is_already_exists() {
                    self.inner.stats.record_error();
                }
                return Err(e);
            }
        }

        // Invalidate after the rename so no read that started earlier can
        // park the old value in memory
        self.inner.memory.invalidate(key);
        self.inner.stats.record_write(written);

        tracing::debug!(key = %key, bytes = written, overwrite, "wrote cache entry");
        Ok(written)
    }
}
