//! Store construction

use crate::config::CacheConfig;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::eviction::MemoryTier;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use super::internal::StoreCounters;
use super::types::{BlobStore, StoreInner};

impl BlobStore {
    /// Open (creating if needed) a store rooted at `base_dir`
    pub async fn new(base_dir: impl Into<PathBuf>, memory_budget_bytes: u64) -> Result<Self> {
        Self::open(CacheConfig::new(base_dir, memory_budget_bytes)).await
    }

    /// Open a store from a full configuration
    pub async fn open(config: CacheConfig) -> Result<Self> {
        let layout = match config.validate() {
            Ok(layout) => layout,
            Err(e) => return Err(e),
        };

        let base_dir = config.base_dir.clone();
        match fs::create_dir_all(&base_dir).await {
            Ok(()) => {}
            Err(e) => {
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

        tracing::debug!(
            base_dir = %base_dir.display(),
            memory_budget = config.memory_budget_bytes,
            shard_depth = layout.depth(),
            shard_width = layout.width(),
            source = ?config.source,
            "opened blob store"
        );

        let inner = Arc::new(StoreInner {
            memory: Arc::new(MemoryTier::new(config.memory_budget_bytes)),
            config,
            base_dir,
            layout,
            stats: StoreCounters::default(),
            background: Mutex::new(Vec::new()),
        });

        Ok(Self { inner })
    }
}
