//! Reader for streaming cached values
//!
//! Supports memory-backed values (resident in the memory tier) and
//! file-backed values read incrementally from disk.

use crate::eviction::MemoryTier;
use crate::keys::StorageKey;
use bytes::Bytes;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader, ReadBuf};

use crate::core::COPY_BUFFER_SIZE;

/// Upper bound on the buffer a siphon reserves before any data arrives
const SIPHON_INITIAL_CAPACITY: u64 = 1024 * 1024;

/// Reader for streaming a cached value
pub struct BlobReader {
    inner: ReaderInner,
    len: u64,
    bytes_read: u64,
}

enum ReaderInner {
    Memory(io::Cursor<Bytes>),
    File {
        file: BufReader<File>,
        siphon: Option<Siphon>,
    },
}

/// Collects the bytes of a disk-backed stream so a fully drained value can
/// be made resident in the memory tier
pub(crate) struct Siphon {
    key: StorageKey,
    tier: Arc<MemoryTier>,
    generation: u64,
    buffer: Vec<u8>,
}

impl Siphon {
    pub(crate) fn new(
        key: StorageKey,
        tier: Arc<MemoryTier>,
        generation: u64,
        len: u64,
    ) -> Self {
        let capacity = len.min(SIPHON_INITIAL_CAPACITY) as usize;
        Self {
            key,
            tier,
            generation,
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Returns false once the collected value no longer fits the tier
    fn push(&mut self, chunk: &[u8]) -> bool {
        let collected = (self.buffer.len() + chunk.len()) as u64;
        if !self.tier.admits(collected) {
            return false;
        }
        self.buffer.extend_from_slice(chunk);
        true
    }

    fn finish(self) {
        let size = self.buffer.len();
        let resident = self
            .tier
            .insert_if_current(
                self.key.clone(),
                Bytes::from(self.buffer),
                self.generation,
            );
        tracing::trace!(key = %self.key, size, resident, "siphoned stream into memory tier");
    }
}

impl BlobReader {
    /// Create a memory-backed reader
    pub fn from_memory(data: Bytes) -> Self {
        Self {
            len: data.len() as u64,
            inner: ReaderInner::Memory(io::Cursor::new(data)),
            bytes_read: 0,
        }
    }

    pub(crate) fn from_file(file: File, len: u64, siphon: Option<Siphon>) -> Self {
        Self {
            inner: ReaderInner::File {
                file: BufReader::with_capacity(COPY_BUFFER_SIZE, file),
                siphon,
            },
            len,
            bytes_read: 0,
        }
    }

    /// Total size of the value in bytes
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of bytes read so far
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the value is served from the memory tier
    pub fn is_memory_backed(&self) -> bool {
        matches!(self.inner, ReaderInner::Memory(_))
    }
}

impl AsyncRead for BlobReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let filled_before = buf.filled().len();
        let wanted = buf.remaining();

        let result = match &mut this.inner {
            ReaderInner::Memory(cursor) => Pin::new(cursor).poll_read(cx, buf),
            ReaderInner::File { file, .. } => Pin::new(file).poll_read(cx, buf),
        };

        if let Poll::Ready(Ok(())) = &result {
            let chunk = &buf.filled()[filled_before..];
            this.bytes_read += chunk.len() as u64;

            if let ReaderInner::File { siphon, .. } = &mut this.inner {
                if chunk.is_empty() {
                    // Zero bytes into a non-empty buffer means end of file
                    if wanted > 0 {
                        if let Some(siphon) = siphon.take() {
                            siphon.finish();
                        }
                    }
                } else if let Some(active) = siphon {
                    if !active.push(chunk) {
                        *siphon = None;
                    }
                }
            }
        }

        result
    }
}

impl std::fmt::Debug for BlobReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReader")
            .field("len", &self.len)
            .field("bytes_read", &self.bytes_read)
            .field("memory_backed", &self.is_memory_backed())
            .finish()
    }
}
