//! Generic cache interface
//!
//! Anything that stores byte values under string keys can implement
//! [`Cache`]; consumers such as an HTTP caching layer depend on the trait
//! only, so implementations are interchangeable.

use async_trait::async_trait;
use bytes::Bytes;

/// Minimal key/value cache contract.
///
/// Misses and failures are indistinguishable here: "unable to retrieve" and
/// "not cached" both yield `None`, and writes and deletes never fail from the
/// caller's point of view.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value, `None` on a miss
    async fn get(&self, key: &str) -> Option<Bytes>;

    /// Store a value, replacing any previous one
    async fn set(&self, key: &str, value: &[u8]);

    /// Remove a value; removing an absent key is a no-op
    async fn delete(&self, key: &str);
}
