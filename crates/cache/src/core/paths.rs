//! Shard layout: where an entry lives under the base directory

use crate::errors::{CacheError, RecoveryHint, Result};
use crate::keys::{StorageKey, STORAGE_KEY_LEN};
use std::path::{Component, Path, PathBuf};

/// Nested directory scheme derived from storage key prefixes.
///
/// With depth 2 and width 2 the key `abcdef…` lives at `<base>/ab/cd/abcdef…`,
/// bounding every directory to 256 children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardLayout {
    depth: usize,
    width: usize,
}

impl Default for ShardLayout {
    fn default() -> Self {
        Self {
            depth: Self::DEFAULT_DEPTH,
            width: Self::DEFAULT_WIDTH,
        }
    }
}

impl ShardLayout {
    pub const DEFAULT_DEPTH: usize = 2;
    pub const DEFAULT_WIDTH: usize = 2;

    pub fn new(depth: usize, width: usize) -> Result<Self> {
        if depth > 0 && width == 0 {
            return Err(CacheError::Configuration {
                message: "shard width must be at least one character".to_string(),
                recovery_hint: RecoveryHint::UseDefault {
                    value: Self::DEFAULT_WIDTH.to_string(),
                },
            });
        }

        match depth.checked_mul(width) {
            Some(prefix) if prefix <= STORAGE_KEY_LEN => Ok(Self { depth, width }),
            _ => Err(CacheError::Configuration {
                message: format!(
                    "shard layout {depth}x{width} needs more than the {STORAGE_KEY_LEN} characters of a storage key"
                ),
                recovery_hint: RecoveryHint::UseDefault {
                    value: format!("{}x{}", Self::DEFAULT_DEPTH, Self::DEFAULT_WIDTH),
                },
            }),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Path of the entry relative to the base directory
    pub fn relative_path(&self, key: &StorageKey) -> PathBuf {
        let hash = key.as_str();
        let mut path = PathBuf::new();
        for level in 0..self.depth {
            let start = level * self.width;
            path.push(&hash[start..start + self.width]);
        }
        path.push(hash);
        path
    }

    /// Generate object path under `base_dir`
    #[inline]
    pub fn object_path(&self, base_dir: &Path, key: &StorageKey) -> PathBuf {
        base_dir.join(self.relative_path(key))
    }

    /// Sibling temp file used while an entry is being written
    pub fn temp_path(final_path: &Path) -> PathBuf {
        final_path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4()))
    }

    /// Recover the storage key from a path relative to the base directory.
    ///
    /// Returns `None` for temp files, foreign files and anything not placed
    /// where this layout would put it.
    pub fn key_from_relative(&self, relative: &Path) -> Option<StorageKey> {
        let mut parts = Vec::with_capacity(self.depth + 1);
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                _ => return None,
            }
        }

        if parts.len() != self.depth + 1 {
            return None;
        }

        let key = StorageKey::parse(parts[self.depth]).ok()?;
        if self.relative_path(&key) != relative {
            return None;
        }
        Some(key)
    }
}
