//! Miscellaneous store operations

mod clear;
mod keys;
mod stats;

use std::path::{Path, PathBuf};

use crate::core::types::BlobStore;
use crate::keys::StorageKey;

impl BlobStore {
    /// On-disk location of the entry for `key`
    #[inline]
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.inner.layout.object_path(&self.inner.base_dir, key)
    }

    /// Base directory the store is rooted at
    pub fn base_dir(&self) -> &Path {
        &self.inner.base_dir
    }

    pub fn config(&self) -> &crate::config::CacheConfig {
        &self.inner.config
    }
}
