//! Background persist tasks

use tokio::io::AsyncRead;

use crate::core::types::BlobStore;
use crate::keys::StorageKey;

impl BlobStore {
    /// Run [`BlobStore::write_stream`] as an independent task.
    ///
    /// The task is fire-and-forget: its outcome is logged, never returned.
    /// [`BlobStore::wait_background`] waits for it to finish.
    pub fn spawn_write_stream<R>(&self, key: StorageKey, reader: R, overwrite: bool)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            match store.write_stream(&key, reader, overwrite).await {
                Ok(bytes) => {
                    tracing::debug!(key = %key, bytes, "background write persisted");
                }
                Err(e) => {
                    tracing::error!(key = %key, error = %e, "background write failed");
                }
            }
        });

        let mut tasks = self.inner.background.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Wait for every background persist task spawned so far.
    ///
    /// This is a quiescence point (shutdown, tests); it does not report
    /// whether the writes succeeded.
    pub async fn wait_background(&self) {
        let tasks = std::mem::take(&mut *self.inner.background.lock());

        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "background write task did not complete");
            }
        }
    }

    /// Number of background persist tasks still running
    pub fn pending_background(&self) -> usize {
        let mut tasks = self.inner.background.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.len()
    }
}
