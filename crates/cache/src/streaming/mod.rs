//! Streaming access to cached values
//!
//! Large values never have to be held in memory whole:
//! - [`BlobReader`] streams a value out of the store (from the memory tier
//!   when resident, from its file otherwise)
//! - [`CacheSink`] streams a value in through a bounded pipe drained by a
//!   background persist task

use async_trait::async_trait;

use crate::traits::Cache;

// Re-export all public types and traits
pub use reader::BlobReader;
pub(crate) use reader::Siphon;
pub use writer::CacheSink;

// Module declarations
mod reader;
mod writer;


/// Streaming cache operations trait
///
/// Extends [`Cache`] with incremental reads and writes for values too large
/// to buffer.
#[async_trait]
pub trait StreamingCache: Cache {
    /// Get a reader for streaming a cached value, `None` on a miss
    async fn get_reader(&self, key: &str) -> Option<BlobReader>;

    /// Get a sink for streaming a value into the cache.
    ///
    /// The value is persisted by a background task as bytes arrive. Shutting
    /// the sink down ends the value; dropping it first abandons the value.
    /// See [`CacheSink`] for the failure semantics.
    async fn get_writer(&self, key: &str) -> CacheSink;
}
