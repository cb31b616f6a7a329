//! In-memory tier in front of the disk store
//!
//! Recently read values are kept resident up to a byte budget. When a new
//! value would push the tier over budget the least recently used values are
//! dropped from memory. Disk copies are never touched by eviction.

mod tier;

pub use tier::MemoryTier;
