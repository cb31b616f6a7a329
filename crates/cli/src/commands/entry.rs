//! Single-entry commands

use diskcache::{BlobStore, StorageKey};
use eyre::WrapErr;
use std::path::PathBuf;
use tokio::io::{self, AsyncWriteExt};

pub async fn get(store: &BlobStore, key: &str) -> eyre::Result<()> {
    let storage_key = StorageKey::for_key(key);

    let mut reader = match store.read_stream(&storage_key).await {
        Ok(reader) => reader,
        Err(e) if e.is_not_found() => eyre::bail!("no entry for {key:?}"),
        Err(e) => return Err(e.into()),
    };

    let mut stdout = io::stdout();
    let copied = io::copy(&mut reader, &mut stdout)
        .await
        .wrap_err("failed to write value to stdout")?;
    stdout.flush().await?;

    tracing::debug!(key = %storage_key, bytes = copied, "streamed entry to stdout");
    Ok(())
}

pub async fn set(store: &BlobStore, key: &str, file: Option<PathBuf>) -> eyre::Result<()> {
    let storage_key = StorageKey::for_key(key);

    let written = match file {
        Some(path) => {
            let source = tokio::fs::File::open(&path)
                .await
                .wrap_err_with(|| format!("failed to open {}", path.display()))?;
            store.write_stream(&storage_key, source, true).await?
        }
        None => store.write_stream(&storage_key, io::stdin(), true).await?,
    };

    tracing::info!(key = %storage_key, bytes = written, "stored entry");
    Ok(())
}

pub async fn delete(store: &BlobStore, key: &str) -> eyre::Result<()> {
    let storage_key = StorageKey::for_key(key);

    match store.erase(&storage_key).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            tracing::debug!(key = %storage_key, "nothing to delete");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn path(store: &BlobStore, key: &str) {
    let storage_key = StorageKey::for_key(key);
    println!("{}\t{}", storage_key, store.path_for(&storage_key).display());
}
