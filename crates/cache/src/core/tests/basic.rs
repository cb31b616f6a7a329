//! Basic store operation tests

use crate::core::BlobStore;
use crate::errors::{CacheError, Result};
use crate::keys::StorageKey;
use tempfile::TempDir;

use super::temp_files;

#[tokio::test]
async fn test_write_and_read() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024 * 1024).await?;
    let key = StorageKey::for_key("key1");

    match store.write(&key, b"value1", true).await {
        Ok(()) => {}
        Err(e) => return Err(e),
    }

    let value = match store.read(&key).await {
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    assert_eq!(&value[..], b"value1");

    Ok(())
}

#[tokio::test]
async fn test_empty_value_round_trips() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;
    let key = StorageKey::for_key("empty");

    store.write(&key, b"", true).await?;

    let value = store.read(&key).await?;
    assert!(value.is_empty());
    assert!(store.has(&key).await);

    Ok(())
}

#[tokio::test]
async fn test_read_missing_is_not_found() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;

    match store.read(&StorageKey::for_key("missing")).await {
        Err(CacheError::NotFound { .. }) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }

    match store.read_stream(&StorageKey::for_key("missing")).await {
        Err(e) => assert!(e.is_not_found()),
        Ok(_) => panic!("expected NotFound"),
    }

    assert_eq!(store.stats().misses, 2);
    assert_eq!(store.stats().errors, 0);

    Ok(())
}

#[tokio::test]
async fn test_overwrite_replaces_value() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;
    let key = StorageKey::for_key("key");

    store.write(&key, b"a much longer first value", true).await?;
    store.write(&key, b"short", true).await?;

    assert_eq!(&store.read(&key).await?[..], b"short");

    Ok(())
}

#[tokio::test]
async fn test_no_overwrite_keeps_existing_value() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;
    let key = StorageKey::for_key("key");

    store.write(&key, b"original", false).await?;

    match store.write(&key, b"replacement", false).await {
        Err(CacheError::AlreadyExists { .. }) => {}
        other => panic!("expected AlreadyExists, got {other:?}"),
    }

    assert_eq!(&store.read(&key).await?[..], b"original");
    assert!(temp_files(temp_dir.path()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_erase() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;
    let key = StorageKey::for_key("key");

    store.write(&key, b"value", true).await?;
    // Make it resident so erase has to drop the memory copy too
    store.read(&key).await?;

    store.erase(&key).await?;

    assert!(!store.has(&key).await);
    match store.read(&key).await {
        Err(e) => assert!(e.is_not_found()),
        Ok(v) => panic!("erased entry still readable: {v:?}"),
    }

    // Second erase reports absence
    match store.erase(&key).await {
        Err(e) => assert!(e.is_not_found()),
        Ok(()) => panic!("expected NotFound"),
    }

    Ok(())
}

#[tokio::test]
async fn test_on_disk_layout() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;
    let key = StorageKey::for_key("layout");

    store.write(&key, b"raw bytes, no header", true).await?;

    let hash = key.as_str();
    let expected = temp_dir
        .path()
        .join(&hash[..2])
        .join(&hash[2..4])
        .join(hash);
    assert_eq!(store.path_for(&key), expected);

    let on_disk = tokio::fs::read(&expected).await.unwrap();
    assert_eq!(on_disk, b"raw bytes, no header");
    assert!(temp_files(temp_dir.path()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_statistics() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = BlobStore::new(temp_dir.path(), 1024).await?;
    let key = StorageKey::for_key("key1");

    store.write(&key, b"value1", true).await?;
    store.read(&key).await?; // disk
    store.read(&key).await?; // memory
    let _ = store.read(&StorageKey::for_key("key2")).await; // miss
    store.erase(&key).await?;

    let stats = store.stats();
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.bytes_written, 6);
    assert_eq!(stats.disk_reads, 1);
    assert_eq!(stats.memory_hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.erases, 1);
    assert_eq!(stats.resident_entries, 0);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_reopen_sees_persisted_entries() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let key = StorageKey::for_key("durable");

    {
        let store = BlobStore::new(temp_dir.path(), 1024).await?;
        store.write(&key, b"survives restart", true).await?;
    }

    let reopened = BlobStore::new(temp_dir.path(), 1024).await?;
    assert_eq!(&reopened.read(&key).await?[..], b"survives restart");

    Ok(())
}
