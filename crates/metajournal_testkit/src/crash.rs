//! Crash simulation for journal storage.
//!
//! [`CrashableBackend`] stops accepting bytes partway through an append, the
//! way a process killed mid-write leaves a journal file. It can also fail
//! reads past a given offset to simulate a device error.

use metajournal_storage::{InMemoryBackend, StorageBackend, StorageError, StorageResult};
use std::io;

/// An in-memory backend that crashes after a byte budget.
#[derive(Debug, Default)]
pub struct CrashableBackend {
    inner: InMemoryBackend,
    crash_after_bytes: Option<u64>,
    fail_reads_from: Option<u64>,
    crashed: bool,
}

impl CrashableBackend {
    /// Creates a backend that never crashes until told to.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Crashes once the stored size would exceed `bytes`. The append that
    /// crosses the limit stores only the bytes that fit.
    pub fn crash_after(&mut self, bytes: u64) {
        self.crash_after_bytes = Some(bytes);
    }

    /// Fails every read touching bytes at or after `offset`.
    pub fn fail_reads_from(&mut self, offset: u64) {
        self.fail_reads_from = Some(offset);
    }

    /// Returns whether an append hit the crash point.
    #[must_use]
    pub fn has_crashed(&self) -> bool {
        self.crashed
    }

    /// Returns the bytes that made it to storage, as a fresh backend. This
    /// is the journal a restarted process would find.
    #[must_use]
    pub fn restart(&self) -> InMemoryBackend {
        InMemoryBackend::with_data(self.inner.data())
    }

    fn crash_error() -> StorageError {
        StorageError::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "simulated crash during append",
        ))
    }
}

impl StorageBackend for CrashableBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        if let Some(limit) = self.fail_reads_from {
            if offset.saturating_add(len as u64) > limit {
                return Err(StorageError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "simulated device error",
                )));
            }
        }
        self.inner.read_at(offset, len)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        if self.crashed {
            return Err(Self::crash_error());
        }

        let offset = self.inner.size()?;
        if let Some(limit) = self.crash_after_bytes {
            let room = limit.saturating_sub(offset);
            if data.len() as u64 > room {
                self.inner.append(&data[..room as usize])?;
                self.crashed = true;
                return Err(Self::crash_error());
            }
        }

        self.inner.append(data)
    }

    fn flush(&mut self) -> StorageResult<()> {
        if self.crashed {
            return Err(Self::crash_error());
        }
        self.inner.flush()
    }

    fn size(&self) -> StorageResult<u64> {
        self.inner.size()
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.flush()
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        self.inner.truncate(new_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_append_at_crash_point() {
        let mut backend = CrashableBackend::new();
        backend.crash_after(7);

        backend.append(b"hello").unwrap();
        assert!(backend.append(b" world").is_err());
        assert!(backend.has_crashed());
        assert_eq!(backend.restart().data(), b"hello w");

        assert!(backend.append(b"!").is_err());
    }

    #[test]
    fn failing_reads() {
        let mut backend = CrashableBackend::new();
        backend.append(b"0123456789").unwrap();
        backend.fail_reads_from(6);

        assert_eq!(backend.read_at(0, 6).unwrap(), b"012345");
        assert!(backend.read_at(4, 4).is_err());
    }
}
