//! Disk-backed byte cache
//!
//! This crate maps opaque string keys to byte values stored on the local
//! filesystem:
//! - Keys are hashed into fixed-length hex [`StorageKey`]s
//! - Values live one file per key in sharded directories, written atomically
//! - A byte-budgeted LRU tier keeps recently read values in memory
//! - Values can be streamed in and out without buffering them whole
//!
//! [`DiskCache`] is the entry point for most callers. [`BlobStore`] is the
//! storage engine underneath, with strict error reporting.

pub mod config;
pub mod core;
pub mod disk_cache;
pub mod errors;
pub mod eviction;
pub mod keys;
pub mod streaming;
pub mod traits;

pub use config::{CacheConfig, CacheConfigBuilder, ConfigSource};
pub use crate::core::{BlobStore, ShardLayout, StoreStats};
pub use disk_cache::DiskCache;
pub use errors::{CacheError, Error, RecoveryHint, Result};
pub use eviction::MemoryTier;
pub use keys::{to_storage_key, StorageKey, STORAGE_KEY_LEN};
pub use streaming::{BlobReader, CacheSink, StreamingCache};
pub use traits::Cache;
