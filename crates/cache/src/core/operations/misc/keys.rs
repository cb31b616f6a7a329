//! Enumerating stored entries

use std::io::ErrorKind;
use std::path::Path;
use walkdir::WalkDir;

use crate::core::paths::ShardLayout;
use crate::core::types::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;

impl BlobStore {
    /// Every storage key currently on disk, sorted
    pub async fn keys(&self) -> Result<Vec<StorageKey>> {
        self.keys_with_prefix("").await
    }

    /// Storage keys on disk starting with the hex `prefix`, sorted
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<StorageKey>> {
        let base_dir = self.inner.base_dir.clone();
        let layout = self.inner.layout;
        let prefix = prefix.to_ascii_lowercase();

        let scan = tokio::task::spawn_blocking(move || scan_keys(&base_dir, layout, &prefix));
        match scan.await {
            Ok(result) => result,
            Err(e) => Err(CacheError::io(
                &self.inner.base_dir,
                "scan cache directory",
                std::io::Error::other(e),
            )),
        }
    }
}

fn scan_keys(base_dir: &Path, layout: ShardLayout, prefix: &str) -> Result<Vec<StorageKey>> {
    let mut keys = Vec::new();

    let walker = WalkDir::new(base_dir)
        .min_depth(1)
        .max_depth(layout.depth() + 1);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| base_dir.to_path_buf());
                match e.into_io_error() {
                    // Raced with an erase pruning the directory
                    Some(io) if io.kind() == ErrorKind::NotFound => continue,
                    Some(io) => return Err(CacheError::io(path, "scan cache directory", io)),
                    None => continue,
                }
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(base_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        if let Some(key) = layout.key_from_relative(relative) {
            if key.as_str().starts_with(prefix) {
                keys.push(key);
            }
        }
    }

    keys.sort();
    Ok(keys)
}
