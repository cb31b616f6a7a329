//! Core store types and structures

use crate::config::CacheConfig;
use crate::eviction::MemoryTier;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::internal::StoreCounters;
use super::paths::ShardLayout;

/// Filesystem-backed blob store with an in-memory LRU tier.
///
/// Cloning is cheap and every clone shares the same files, memory tier and
/// statistics.
#[derive(Clone)]
pub struct BlobStore {
    pub(super) inner: Arc<StoreInner>,
}

pub(super) struct StoreInner {
    /// Configuration
    pub config: CacheConfig,
    /// Base directory for file-based storage
    pub base_dir: PathBuf,
    pub layout: ShardLayout,
    /// In-memory tier for hot data
    pub memory: Arc<MemoryTier>,
    /// Statistics
    pub stats: StoreCounters,
    /// Persist tasks spawned by streaming writers
    pub background: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("base_dir", &self.inner.base_dir)
            .field("layout", &self.inner.layout)
            .field("memory", &self.inner.memory)
            .finish()
    }
}
