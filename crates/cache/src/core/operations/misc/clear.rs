//! Erase every entry

use std::io::ErrorKind;
use tokio::fs;

use crate::core::types::BlobStore;
use crate::errors::{CacheError, RecoveryHint, Result};

impl BlobStore {
    /// Remove every entry and reset the memory tier. The base directory is
    /// recreated empty.
    pub async fn erase_all(&self) -> Result<()> {
        let base_dir = &self.inner.base_dir;
        let removed = fs::remove_dir_all(base_dir).await;

        // After the files are gone, as in erase
        self.inner.memory.clear();

        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                self.inner.stats.record_error();
                return Err(CacheError::io(base_dir, "remove cache directory", e));
            }
        }

        match fs::create_dir_all(base_dir).await {
            Ok(()) => {}
            Err(e) => {
                self.inner.stats.record_error();
                return Err(CacheError::Io {
                    path: base_dir.clone(),
                    operation: "create cache directory",
                    source: e,
                    recovery_hint: RecoveryHint::CheckPermissions {
                        path: base_dir.clone(),
                    },
                });
            }
        }

        tracing::info!(base_dir = %base_dir.display(), "cleared cache");
        Ok(())
    }
}
