//! Whole-cache commands

use diskcache::BlobStore;

pub async fn keys(store: &BlobStore, prefix: Option<&str>) -> eyre::Result<()> {
    let keys = match prefix {
        Some(prefix) => {
            if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
                eyre::bail!("prefix {prefix:?} is not hexadecimal");
            }
            store.keys_with_prefix(prefix).await?
        }
        None => store.keys().await?,
    };

    for key in &keys {
        println!("{key}");
    }

    tracing::debug!(count = keys.len(), "listed entries");
    Ok(())
}

pub async fn clear(store: &BlobStore) -> eyre::Result<()> {
    store.erase_all().await?;
    tracing::info!(base_dir = %store.base_dir().display(), "cache cleared");
    Ok(())
}
