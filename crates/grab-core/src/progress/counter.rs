//! Pass-through byte counter and the tee writer that feeds it.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// (downloaded, total) as seen by one read of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Bytes observed so far. Never decreases.
    pub downloaded: u64,
    /// Total expected bytes, fixed at construction.
    pub total: u64,
}

/// Counts bytes handed to it and nothing else.
///
/// Only the copy loop calls [`accept`](Self::accept); the notifier only reads.
/// Reads may be momentarily stale, which is fine for advisory progress.
#[derive(Debug)]
pub struct ProgressCounter {
    downloaded: AtomicU64,
    total: u64,
}

impl ProgressCounter {
    pub fn new(total: u64) -> Self {
        Self {
            downloaded: AtomicU64::new(0),
            total,
        }
    }

    /// Records `chunk.len()` more bytes. Never fails, never blocks, never looks at the data.
    pub fn accept(&self, chunk: &[u8]) {
        self.downloaded
            .fetch_add(chunk.len() as u64, Ordering::Relaxed);
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            downloaded: self.downloaded(),
            total: self.total,
        }
    }
}

/// Writes every chunk to `inner` and counts exactly the bytes `inner` accepted.
///
/// Order is preserved and data is not modified. Errors come only from `inner`.
pub struct TeeWriter<W> {
    inner: W,
    counter: Arc<ProgressCounter>,
}

impl<W: Write> TeeWriter<W> {
    pub fn new(inner: W, counter: Arc<ProgressCounter>) -> Self {
        Self { inner, counter }
    }

    pub fn counter(&self) -> &ProgressCounter {
        &self.counter
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.counter.accept(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
