//! Frame writer.

use crate::config::FormatterConfig;
use crate::error::{CoreError, CoreResult};
use crate::record::JournalRecord;
use metajournal_codec::varint::{encode_varint, encoded_len};
use std::io::Write;
use tracing::debug;

/// Writes records as length-delimited frames.
///
/// Holds no state between calls besides its size limit. Flushing and
/// syncing the sink are the caller's responsibility.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    max_frame_size: usize,
}

impl FrameWriter {
    /// Creates a writer using `config`'s frame size limit.
    #[must_use]
    pub fn new(config: &FormatterConfig) -> Self {
        Self {
            max_frame_size: config.max_frame_size,
        }
    }

    /// Encodes `record` and writes it to `sink` as one frame.
    ///
    /// Returns the number of bytes written (length prefix plus payload).
    ///
    /// # Errors
    ///
    /// - [`CoreError::Codec`] if the record fails to encode
    /// - [`CoreError::FrameTooLarge`] if the payload exceeds the limit;
    ///   nothing is written in that case
    /// - [`CoreError::Io`] if the sink fails, unchanged and without retry
    pub fn write<R, W>(&self, record: &R, sink: &mut W) -> CoreResult<usize>
    where
        R: JournalRecord,
        W: Write + ?Sized,
    {
        let payload = record.encode()?;
        let frame = self.frame_payload(&payload)?;
        sink.write_all(&frame)?;

        debug!(
            sequence = record.sequence_number().as_u64(),
            payload_len = payload.len(),
            frame_len = frame.len(),
            "wrote journal frame"
        );
        Ok(frame.len())
    }

    /// Builds the frame bytes for an already encoded payload.
    ///
    /// The whole frame is returned as one buffer so a sink receives it in a
    /// single `write_all`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FrameTooLarge`] if the payload exceeds the limit.
    pub fn frame_payload(&self, payload: &[u8]) -> CoreResult<Vec<u8>> {
        if payload.len() > self.max_frame_size {
            return Err(CoreError::frame_too_large(
                payload.len(),
                self.max_frame_size,
            ));
        }

        let len = payload.len() as u64;
        let mut frame = Vec::with_capacity(encoded_len(len) + payload.len());
        encode_varint(len, &mut frame);
        frame.extend_from_slice(payload);
        Ok(frame)
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new(&FormatterConfig::default())
    }
}
