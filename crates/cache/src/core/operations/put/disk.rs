//! Disk write operations for put

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};

use crate::core::paths::ShardLayout;
use crate::core::types::BlobStore;
use crate::core::COPY_BUFFER_SIZE;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::keys::StorageKey;

impl BlobStore {
    /// Create the shard directories and an empty temp file beside `final_path`
    pub(super) async fn create_temp_file(&self, final_path: &Path) -> Result<(PathBuf, File)> {
        let parent = match final_path.parent() {
            Some(p) => p,
            None => {
                return Err(CacheError::configuration(format!(
                    "cache entry path '{}' has no parent directory",
                    final_path.display()
                )));
            }
        };

        let temp_path = ShardLayout::temp_path(final_path);

        // A concurrent erase may prune the shard directory between creating
        // it and creating the file, so try twice
        let mut attempts = 0;
        loop {
            attempts += 1;

            match fs::create_dir_all(parent).await {
                Ok(()) => {}
                Err(e) => {
                    return Err(CacheError::Io {
                        path: parent.to_path_buf(),
                        operation: "create shard directory",
                        source: e,
                        recovery_hint: RecoveryHint::CheckPermissions {
                            path: parent.to_path_buf(),
                        },
                    });
                }
            }

            match File::create(&temp_path).await {
                Ok(file) => return Ok((temp_path, file)),
                Err(e) if e.kind() == ErrorKind::NotFound && attempts < 2 => continue,
                Err(e) => {
                    return Err(CacheError::io(&temp_path, "create temporary cache file", e));
                }
            }
        }
    }

    /// Copy `reader` into the temp file, flush and optionally fsync it
    pub(super) async fn stream_to_temp<R>(
        &self,
        temp_path: &Path,
        file: File,
        reader: &mut R,
    ) -> Result<u64>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut total_bytes = 0u64;

        loop {
            let n = match reader.read(&mut buffer).await {
                Ok(0) => break, // EOF
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CacheError::io(temp_path, "read from source stream", e)),
            };

            match writer.write_all(&buffer[..n]).await {
                Ok(()) => {}
                Err(e) => return Err(CacheError::io(temp_path, "write temporary cache file", e)),
            }

            total_bytes += n as u64;
        }

        match writer.flush().await {
            Ok(()) => {}
            Err(e) => return Err(CacheError::io(temp_path, "flush temporary cache file", e)),
        }

        let mut file = writer.into_inner();

        if self.inner.config.sync_writes {
            match file.sync_all().await {
                Ok(()) => {}
                Err(e) => return Err(CacheError::io(temp_path, "sync cache file to disk", e)),
            }
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if let Some(mode) = self.inner.config.file_mode {
                match file.set_permissions(std::fs::Permissions::from_mode(mode)).await {
                    Ok(()) => {}
                    Err(e) => {
                        return Err(CacheError::io(temp_path, "set cache file permissions", e));
                    }
                }
            }
        }

        match file.shutdown().await {
            Ok(()) => {}
            Err(e) => return Err(CacheError::io(temp_path, "close temporary cache file", e)),
        }

        Ok(total_bytes)
    }

    /// Move the finished temp file into place.
    ///
    /// Overwrites use `rename`, which atomically replaces the old entry.
    /// No-clobber writes use `hard_link`, which atomically fails when the
    /// destination exists.
    pub(super) async fn commit(
        &self,
        key: &StorageKey,
        temp_path: &Path,
        final_path: &Path,
        overwrite: bool,
    ) -> Result<()> {
        if overwrite {
            return match fs::rename(temp_path, final_path).await {
                Ok(()) => Ok(()),
                Err(e) => Err(CacheError::io(final_path, "rename cache entry into place", e)),
            };
        }

        match fs::hard_link(temp_path, final_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(CacheError::already_exists(key.as_str()));
            }
            Err(e) => return Err(CacheError::io(final_path, "link cache entry into place", e)),
        }

        match fs::remove_file(temp_path).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to remove temporary cache file"
                );
                Ok(())
            }
        }
    }
}
