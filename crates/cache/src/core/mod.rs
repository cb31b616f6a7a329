//! The blob store: sharded files on disk behind a bounded memory tier
//!
//! - One file per entry, named by its storage key and nested under shard
//!   directories derived from the key prefix
//! - Entries become visible atomically: data is streamed into a temp file
//!   next to its destination and renamed (or hard-linked) into place
//! - Reads fill a byte-budgeted LRU tier; eviction never touches disk

pub mod internal;

// Private modules
mod builder;
mod operations;
mod paths;
mod streaming;
mod types;

pub use internal::StoreStats;
pub use paths::ShardLayout;
pub use types::BlobStore;

/// Buffer size used when copying streams to and from disk
pub(crate) const COPY_BUFFER_SIZE: usize = 64 * 1024;

#[cfg(test)]
mod tests;
