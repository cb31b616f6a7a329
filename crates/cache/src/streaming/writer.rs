//! Sink half of a streaming write

use crate::keys::StorageKey;
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

pin_project! {
    /// Sink for streaming a value into the cache.
    ///
    /// Bytes written here cross a bounded in-memory pipe to a background
    /// task that persists them; when the pipe is full, writes wait for the
    /// task to catch up. Only shutting the sink down marks the end of the
    /// value; the task then moves the entry into place. A sink dropped
    /// without shutdown abandons the value and any previous one stays.
    ///
    /// The persist outcome is not reported back. A failure after the sink
    /// has been handed out (disk full, permissions) is logged and the
    /// previous value, if any, stays in place. A failure early enough to
    /// close the pipe surfaces as a `BrokenPipe` error on the next write.
    pub struct CacheSink {
        #[pin]
        pipe: DuplexStream,
        key: StorageKey,
        bytes_written: u64,
        finished: Arc<AtomicBool>,
    }
}

pin_project! {
    /// Read half of a [`CacheSink`] pipe, drained by the persist task.
    ///
    /// End of stream is only reported once the sink was shut down; a pipe
    /// closed by dropping the sink yields `UnexpectedEof` instead.
    pub(crate) struct SinkSource {
        #[pin]
        pipe: DuplexStream,
        finished: Arc<AtomicBool>,
    }
}

impl CacheSink {
    /// Sink for `key` and the source its persist task reads from
    pub(crate) fn pipe(key: StorageKey, capacity: usize) -> (Self, SinkSource) {
        let (sink, source) = tokio::io::duplex(capacity);
        let finished = Arc::new(AtomicBool::new(false));

        let sink = Self {
            pipe: sink,
            key,
            bytes_written: 0,
            finished: Arc::clone(&finished),
        };
        (
            sink,
            SinkSource {
                pipe: source,
                finished,
            },
        )
    }

    /// Storage key the value is persisted under
    pub fn storage_key(&self) -> &StorageKey {
        &self.key
    }

    /// Bytes accepted by the pipe so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl AsyncWrite for CacheSink {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();

        match this.pipe.poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                *this.bytes_written += n as u64;
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().pipe.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.project();
        // Set before closing so the source never sees end of stream first
        this.finished.store(true, Ordering::Release);
        this.pipe.poll_shutdown(cx)
    }
}

impl AsyncRead for SinkSource {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.project();
        let filled_before = buf.filled().len();
        let wanted = buf.remaining();

        match this.pipe.poll_read(cx, buf) {
            Poll::Ready(Ok(())) if wanted > 0 && buf.filled().len() == filled_before => {
                if this.finished.load(Ordering::Acquire) {
                    Poll::Ready(Ok(()))
                } else {
                    Poll::Ready(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "cache sink dropped without shutdown",
                    )))
                }
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for CacheSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSink")
            .field("key", &self.key)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}
