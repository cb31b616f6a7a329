//! Blob store tests

mod basic;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every file under `base` whose name marks it as an in-flight temp file
pub(super) fn temp_files(base: &Path) -> Vec<PathBuf> {
    WalkDir::new(base)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
        .map(|entry| entry.into_path())
        .collect()
}
