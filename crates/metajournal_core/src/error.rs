//! Error types for metajournal core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while writing or reading journal frames.
///
/// A torn final frame is **not** an error; readers report it as
/// [`crate::ReadOutcome::Truncated`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] metajournal_storage::StorageError),

    /// Record encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] metajournal_codec::CodecError),

    /// I/O error on the underlying sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoded record exceeds the configured frame limit.
    #[error("frame of {size} bytes exceeds the {max} byte limit")]
    FrameTooLarge {
        /// Encoded payload size.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The reader already failed with an I/O error.
    #[error("journal reader failed earlier and cannot continue")]
    ReaderFailed,
}

impl CoreError {
    /// Creates a frame too large error.
    pub fn frame_too_large(size: usize, max: usize) -> Self {
        Self::FrameTooLarge { size, max }
    }
}
