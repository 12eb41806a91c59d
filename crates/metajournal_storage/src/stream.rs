//! `std::io` adapters over a [`StorageBackend`].
//!
//! The framing layer speaks `io::Read` and `io::Write`; these adapters let
//! it run over any backend. Storage errors cross the boundary as
//! `io::Error` so they take the framing layer's I/O-failure path.

use crate::backend::StorageBackend;
use std::io;

/// Upper bound on a single backend read issued by [`BackendReader`].
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Sequential `io::Read` over a backend, starting at a given offset.
///
/// Reads return `Ok(0)` once the cursor reaches the backend's size.
pub struct BackendReader<'a> {
    backend: &'a dyn StorageBackend,
    offset: u64,
}

impl<'a> BackendReader<'a> {
    /// Creates a reader positioned at `offset`.
    pub fn new(backend: &'a dyn StorageBackend, offset: u64) -> Self {
        Self { backend, offset }
    }

    /// Current read position in the backend.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.offset
    }
}

impl io::Read for BackendReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = self.backend.size()?;
        if buf.is_empty() || self.offset >= size {
            return Ok(0);
        }

        let available = usize::try_from(size - self.offset).unwrap_or(usize::MAX);
        let len = buf.len().min(available).min(READ_CHUNK_SIZE);
        let data = self.backend.read_at(self.offset, len)?;
        buf[..data.len()].copy_from_slice(&data);
        self.offset += data.len() as u64;
        Ok(data.len())
    }
}

impl std::fmt::Debug for BackendReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendReader")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// `io::Write` that appends every write to a backend.
///
/// Each `write` call becomes exactly one `append`, so a caller that hands
/// over a whole frame in one `write_all` produces one append per frame.
pub struct BackendWriter<'a> {
    backend: &'a mut dyn StorageBackend,
    written: u64,
}

impl<'a> BackendWriter<'a> {
    /// Creates a writer appending to `backend`.
    pub fn new(backend: &'a mut dyn StorageBackend) -> Self {
        Self {
            backend,
            written: 0,
        }
    }

    /// Bytes appended through this writer.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl io::Write for BackendWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.backend.append(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.backend.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for BackendWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendWriter")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
