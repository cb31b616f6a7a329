use super::*;
use futures::future::join_all;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn setup(memory_budget: u64) -> (TempDir, DiskCache) {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(temp_dir.path(), memory_budget)
        .await
        .unwrap();
    (temp_dir, cache)
}

async fn stream_in(cache: &DiskCache, key: &str, value: &[u8]) {
    let mut writer = cache.get_writer(key).await;
    writer.write_all(value).await.unwrap();
    writer.shutdown().await.unwrap();
    cache.store().wait_background().await;
}

async fn stream_out(cache: &DiskCache, key: &str) -> Option<Vec<u8>> {
    let mut reader = cache.get_reader(key).await?;
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await.unwrap();
    Some(buffer)
}

#[tokio::test]
async fn test_set_then_get() {
    let (_temp_dir, cache) = setup(1024 * 1024).await;

    cache.set("user:42", b"payload").await;
    assert_eq!(cache.get("user:42").await.as_deref(), Some(&b"payload"[..]));

    cache.set("empty", b"").await;
    assert_eq!(cache.get("empty").await.as_deref(), Some(&b""[..]));
}

#[tokio::test]
async fn test_get_unset_key_is_none() {
    let (_temp_dir, cache) = setup(1024).await;
    assert!(cache.get("never set").await.is_none());
}

#[tokio::test]
async fn test_later_set_wins() {
    let (_temp_dir, cache) = setup(1024 * 1024).await;

    cache.set("k", b"first").await;
    assert_eq!(cache.get("k").await.as_deref(), Some(&b"first"[..]));

    cache.set("k", b"second").await;
    assert_eq!(cache.get("k").await.as_deref(), Some(&b"second"[..]));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (_temp_dir, cache) = setup(1024).await;

    cache.set("k", b"v").await;
    cache.delete("k").await;
    assert!(cache.get("k").await.is_none());

    // Deleting again, or deleting something never set, is silent
    cache.delete("k").await;
    cache.delete("never set").await;
    assert!(cache.get("k").await.is_none());
}

#[tokio::test]
async fn test_keys_with_path_characters() {
    let (temp_dir, cache) = setup(1024).await;

    let keys = ["../escape", "a/b/c", "", "with space", "ünïcödé", "C:\\windows"];
    for (i, key) in keys.iter().enumerate() {
        cache.set(key, format!("value-{i}").as_bytes()).await;
    }
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(
            cache.get(key).await,
            Some(Bytes::from(format!("value-{i}")))
        );
    }

    // Nothing escaped the base directory
    assert!(!temp_dir.path().parent().unwrap().join("escape").exists());
    assert_eq!(cache.store().keys().await.unwrap().len(), keys.len());
}

#[tokio::test]
async fn test_streaming_matches_whole_value_access() {
    let (_temp_dir, cache) = setup(4096).await;

    // Zero bytes up to several times the memory budget
    for size in [0usize, 1, 4095, 4096, 4097, 5 * 4096] {
        let value: Vec<u8> = (0..size).map(|i| (i * 31 % 256) as u8).collect();
        let key = format!("size-{size}");

        stream_in(&cache, &key, &value).await;
        assert_eq!(stream_out(&cache, &key).await, Some(value.clone()));
        assert_eq!(cache.get(&key).await.as_deref(), Some(&value[..]));

        let key = format!("set-{size}");
        cache.set(&key, &value).await;
        assert_eq!(stream_out(&cache, &key).await, Some(value));
    }
}

#[tokio::test]
async fn test_get_reader_after_delete() {
    let (_temp_dir, cache) = setup(1024).await;

    stream_in(&cache, "k", b"streamed").await;
    cache.delete("k").await;

    assert!(cache.get_reader("k").await.is_none());
}

#[tokio::test]
async fn test_eviction_never_loses_values() {
    let (_temp_dir, cache) = setup(2048).await;

    let values: Vec<Vec<u8>> = (0..20u8).map(|i| vec![i; 512]).collect();
    for (i, value) in values.iter().enumerate() {
        cache.set(&format!("k{i}"), value).await;
    }

    // Two passes so every value is read both cold and after eviction
    for _ in 0..2 {
        for (i, value) in values.iter().enumerate() {
            assert_eq!(cache.get(&format!("k{i}")).await.as_deref(), Some(&value[..]));
        }
    }

    let stats = cache.store().stats();
    assert!(stats.evictions > 0);
    assert!(stats.resident_bytes <= 2048);
}

#[tokio::test]
async fn test_values_outlive_the_handle() {
    let temp_dir = TempDir::new().unwrap();

    {
        let cache = DiskCache::new(temp_dir.path(), 1024).await.unwrap();
        cache.set("persistent", b"still here").await;
    }

    let cache = DiskCache::new(temp_dir.path(), 1024).await.unwrap();
    assert_eq!(
        cache.get("persistent").await.as_deref(),
        Some(&b"still here"[..])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access() {
    let (_temp_dir, cache) = setup(64 * 1024).await;
    let cache = Arc::new(cache);

    let tasks = (0..32).map(|i| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            let key = format!("key-{i}");
            let value = format!("value-{i}").repeat(i + 1);
            cache.set(&key, value.as_bytes()).await;
            let read = cache.get(&key).await;
            assert_eq!(read.as_deref(), Some(value.as_bytes()));
        })
    });

    for result in join_all(tasks).await {
        result.unwrap();
    }
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let (_temp_dir, cache) = setup(1024).await;

    let plain: Arc<dyn Cache> = Arc::new(cache.clone());
    exercise(plain.as_ref()).await;

    let streaming: Arc<dyn StreamingCache> = Arc::new(cache.clone());
    let mut writer = streaming.get_writer("dyn").await;
    writer.write_all(b"through a trait object").await.unwrap();
    writer.shutdown().await.unwrap();
    cache.store().wait_background().await;

    assert_eq!(
        streaming.get("dyn").await.as_deref(),
        Some(&b"through a trait object"[..])
    );
    assert!(streaming.get_reader("dyn").await.is_some());
}

async fn exercise(cache: &dyn Cache) {
    cache.set("k", b"v").await;
    assert_eq!(cache.get("k").await.as_deref(), Some(&b"v"[..]));
    cache.delete("k").await;
    assert!(cache.get("k").await.is_none());
}

#[tokio::test]
async fn test_failures_are_swallowed() {
    let temp_dir = TempDir::new().unwrap();
    let base_dir = temp_dir.path().join("cache");
    let cache = DiskCache::new(&base_dir, 1024).await.unwrap();

    // Replace the base directory with a plain file so every operation fails
    std::fs::remove_dir_all(&base_dir).unwrap();
    std::fs::write(&base_dir, b"not a directory").unwrap();

    cache.set("k", b"v").await;
    assert!(cache.get("k").await.is_none());
    cache.delete("k").await;
    assert!(cache.get_reader("k").await.is_none());

    assert!(cache.store().stats().errors > 0);
}
