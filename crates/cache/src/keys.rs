//! Mapping of caller keys onto filesystem-safe storage keys
//!
//! Callers address the cache with arbitrary strings (URLs, request
//! fingerprints, anything). On disk every entry is named by the SHA-256
//! digest of that string, rendered as lowercase hex. The digest is a pure
//! function of the key bytes, so the same key finds the same file across
//! processes and restarts.

use crate::errors::{CacheError, RecoveryHint, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length in hex characters of every [`StorageKey`]
pub const STORAGE_KEY_LEN: usize = 64;

/// Fixed-length hex digest identifying an entry on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the storage key for a caller key
    #[inline]
    pub fn for_key(key: &str) -> Self {
        to_storage_key(key)
    }

    /// Parse the hex text of a storage key, as found in the shard tree
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() != STORAGE_KEY_LEN {
            return Err(CacheError::InvalidKey {
                key: text.to_string(),
                reason: format!(
                    "expected {} hex characters, got {}",
                    STORAGE_KEY_LEN,
                    text.len()
                ),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Derive storage keys with StorageKey::for_key".to_string(),
                },
            });
        }

        if !text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CacheError::InvalidKey {
                key: text.to_string(),
                reason: "only lowercase hex characters are allowed".to_string(),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Derive storage keys with StorageKey::for_key".to_string(),
                },
            });
        }

        Ok(Self(text.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for StorageKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Hash a cache key into its storage key
pub fn to_storage_key(key: &str) -> StorageKey {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    StorageKey(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_digest() {
        // SHA-256 of the empty string
        assert_eq!(
            to_storage_key("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_path_unsafe_keys_are_mapped() {
        for key in ["../../etc/passwd", "a/b\\c", "key with spaces", "\0", "ключ"] {
            let storage_key = to_storage_key(key);
            assert_eq!(storage_key.as_str().len(), STORAGE_KEY_LEN);
            assert!(!storage_key.as_str().contains('/'));
            assert!(!storage_key.as_str().contains('.'));
        }
    }

    #[test]
    fn test_parse_round_trips_derived_keys() {
        let derived = to_storage_key("https://example.com/resource?id=7");
        let parsed: StorageKey = derived.as_str().parse().unwrap();
        assert_eq!(parsed, derived);
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(StorageKey::parse("abc").is_err());
        assert!(StorageKey::parse(&"g".repeat(STORAGE_KEY_LEN)).is_err());
        assert!(StorageKey::parse(&"A".repeat(STORAGE_KEY_LEN)).is_err());
        let tmp_name = format!("{}.tmp", "a".repeat(STORAGE_KEY_LEN - 4));
        assert!(StorageKey::parse(&tmp_name).is_err());
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let digests: HashSet<StorageKey> = (0..10_000)
            .map(|i| to_storage_key(&format!("key-{i}")))
            .collect();
        assert_eq!(digests.len(), 10_000);
    }

    proptest! {
        #[test]
        fn storage_key_is_deterministic(key in ".*") {
            prop_assert_eq!(to_storage_key(&key), to_storage_key(&key));
        }

        #[test]
        fn storage_key_is_lowercase_hex(key in ".*") {
            let storage_key = to_storage_key(&key);
            prop_assert_eq!(storage_key.as_str().len(), STORAGE_KEY_LEN);
            prop_assert!(storage_key
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        }

        #[test]
        fn distinct_keys_map_apart(a in ".*", b in ".*") {
            prop_assume!(a != b);
            prop_assert_ne!(to_storage_key(&a), to_storage_key(&b));
        }
    }
}
