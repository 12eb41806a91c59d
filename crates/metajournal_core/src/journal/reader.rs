//! Frame reader.
//!
//! Reads frames one at a time from a byte source and folds every way the
//! final frame can be incomplete into [`ReadOutcome::Truncated`]. Only
//! failures of the source itself surface as errors.

use crate::config::FormatterConfig;
use crate::error::{CoreError, CoreResult};
use crate::record::JournalRecord;
use crate::types::SequenceNumber;
use metajournal_codec::VarintDecoder;
use std::io::{self, Read};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, warn};

/// Result of asking a reader for the next record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<R> {
    /// A complete, decoded record.
    Record(R),
    /// The source ended exactly on a frame boundary.
    EndOfStream,
    /// The source ends with an incomplete or undecodable frame. The valid
    /// prefix ends before it; nothing after it is read.
    Truncated(TruncationCause),
}

impl<R> ReadOutcome<R> {
    /// Returns the record, if any.
    pub fn into_record(self) -> Option<R> {
        match self {
            Self::Record(record) => Some(record),
            Self::EndOfStream | Self::Truncated(_) => None,
        }
    }

    /// Returns `true` for [`ReadOutcome::Truncated`].
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated(_))
    }
}

/// Why the final frame was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TruncationCause {
    /// The source ended inside the length prefix.
    #[error("length prefix cut after {bytes_read} bytes")]
    PartialLength {
        /// Prefix bytes that were present.
        bytes_read: usize,
    },

    /// The length prefix is not a valid varint.
    #[error("malformed length prefix: {reason}")]
    MalformedLength {
        /// Decoder message.
        reason: String,
    },

    /// The length prefix exceeds the configured frame limit.
    #[error("frame length {size} exceeds the {max} byte limit")]
    OversizedFrame {
        /// Declared payload length.
        size: u64,
        /// Configured maximum.
        max: usize,
    },

    /// The source ended inside the payload.
    #[error("expected {expected} payload bytes but only {available} were present")]
    PartialPayload {
        /// Declared payload length.
        expected: usize,
        /// Payload bytes that were present.
        available: usize,
    },

    /// The payload is complete but does not decode as a record.
    #[error("payload failed to decode: {reason}")]
    Corrupt {
        /// Decoder message.
        reason: String,
        /// Length prefix plus payload of the rejected frame.
        frame_len: u64,
    },
}

impl TruncationCause {
    /// Returns `true` if the discarded frame, starting at `frame_start`,
    /// runs to the end of a source holding `source_len` bytes.
    ///
    /// Cut frames always do. An undecodable frame does only when nothing
    /// follows it. A garbled length prefix gives no trustworthy frame end,
    /// so it never counts as a tail.
    #[must_use]
    pub fn is_tail(&self, frame_start: u64, source_len: u64) -> bool {
        match self {
            Self::PartialLength { .. } | Self::PartialPayload { .. } => true,
            Self::Corrupt { frame_len, .. } => {
                frame_start.saturating_add(*frame_len) == source_len
            }
            Self::MalformedLength { .. } | Self::OversizedFrame { .. } => false,
        }
    }
}

/// Lifecycle of a [`FrameReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// More records may follow.
    Open,
    /// No more records. `truncated` is set when the pass ended on a torn
    /// or undecodable frame rather than a clean boundary.
    Exhausted {
        /// Whether a trailing frame was discarded.
        truncated: bool,
    },
    /// The source returned an I/O error.
    Failed,
}

impl ReaderState {
    /// Returns `true` once no further records will be produced.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Outcome of reading a length prefix.
enum LengthPrefix {
    Value { size: u64, header_len: usize },
    End,
    Torn(TruncationCause),
}

/// Stateful reader producing records from one pass over a byte source.
///
/// The reader owns its source and a reusable payload buffer. It reads the
/// length prefix one byte at a time, so wrap unbuffered sources such as a
/// `File` in a `BufReader`.
///
/// # Example
///
/// ```
/// use metajournal_core::{FrameReader, FrameWriter, JournalEntry, ReadOutcome, SequenceNumber};
///
/// let writer = FrameWriter::default();
/// let mut log = Vec::new();
/// writer.write(&JournalEntry::new(SequenceNumber::new(1), vec![1]), &mut log).unwrap();
/// writer.write(&JournalEntry::new(SequenceNumber::new(2), vec![2]), &mut log).unwrap();
/// log.truncate(log.len() - 1); // crash mid-write
///
/// let mut reader = FrameReader::<JournalEntry, _>::new(log.as_slice());
/// assert!(matches!(reader.next_record().unwrap(), ReadOutcome::Record(_)));
/// assert!(reader.next_record().unwrap().is_truncated());
/// assert_eq!(reader.latest_sequence_number(), SequenceNumber::new(1));
/// ```
pub struct FrameReader<R, S> {
    source: S,
    scratch: Vec<u8>,
    max_frame_size: usize,
    latest_sequence_number: SequenceNumber,
    valid_offset: u64,
    records_read: u64,
    state: ReaderState,
    truncation: Option<TruncationCause>,
    _record: PhantomData<fn() -> R>,
}

impl<R: JournalRecord, S: Read> FrameReader<R, S> {
    /// Creates a reader over `source` with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, &FormatterConfig::default())
    }

    /// Creates a reader over `source`.
    pub fn with_config(source: S, config: &FormatterConfig) -> Self {
        Self {
            source,
            scratch: vec![0u8; config.scratch_capacity],
            max_frame_size: config.max_frame_size,
            latest_sequence_number: SequenceNumber::UNSET,
            valid_offset: 0,
            records_read: 0,
            state: ReaderState::Open,
            truncation: None,
            _record: PhantomData,
        }
    }

    /// Reads the next record.
    ///
    /// Once the reader is exhausted this keeps returning
    /// [`ReadOutcome::EndOfStream`] without touching the source.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Io`] if the source fails for a reason other than
    ///   running out of bytes; the reader moves to [`ReaderState::Failed`]
    /// - [`CoreError::ReaderFailed`] on any call after that
    pub fn next_record(&mut self) -> CoreResult<ReadOutcome<R>> {
        match self.state {
            ReaderState::Open => {}
            ReaderState::Exhausted { .. } => return Ok(ReadOutcome::EndOfStream),
            ReaderState::Failed => return Err(CoreError::ReaderFailed),
        }

        match self.read_frame() {
            Ok(ReadOutcome::EndOfStream) => {
                debug!(
                    records = self.records_read,
                    valid_offset = self.valid_offset,
                    "journal reached clean end of stream"
                );
                self.state = ReaderState::Exhausted { truncated: false };
                Ok(ReadOutcome::EndOfStream)
            }
            Ok(ReadOutcome::Truncated(cause)) => {
                warn!(
                    offset = self.valid_offset,
                    last_sequence = self.latest_sequence_number.as_u64(),
                    cause = %cause,
                    "failed to read journal entry; ignoring truncated final frame"
                );
                self.state = ReaderState::Exhausted { truncated: true };
                self.truncation = Some(cause.clone());
                Ok(ReadOutcome::Truncated(cause))
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.state = ReaderState::Failed;
                Err(e)
            }
        }
    }

    fn read_frame(&mut self) -> CoreResult<ReadOutcome<R>> {
        let (size, header_len) = match self.read_length()? {
            LengthPrefix::Value { size, header_len } => (size, header_len),
            LengthPrefix::End => return Ok(ReadOutcome::EndOfStream),
            LengthPrefix::Torn(cause) => return Ok(ReadOutcome::Truncated(cause)),
        };

        let size = match usize::try_from(size) {
            Ok(size) if size <= self.max_frame_size => size,
            _ => {
                return Ok(ReadOutcome::Truncated(TruncationCause::OversizedFrame {
                    size,
                    max: self.max_frame_size,
                }))
            }
        };

        let mut one_off;
        let buffer = if size <= self.scratch.len() {
            &mut self.scratch[..size]
        } else {
            one_off = vec![0u8; size];
            one_off.as_mut_slice()
        };

        let available = fill(&mut self.source, buffer)?;
        if available < size {
            return Ok(ReadOutcome::Truncated(TruncationCause::PartialPayload {
                expected: size,
                available,
            }));
        }

        let record = match R::decode(buffer) {
            Ok(record) => record,
            Err(e) => {
                return Ok(ReadOutcome::Truncated(TruncationCause::Corrupt {
                    reason: e.to_string(),
                    frame_len: (header_len + size) as u64,
                }))
            }
        };

        self.latest_sequence_number = record.sequence_number();
        self.valid_offset += (header_len + size) as u64;
        self.records_read += 1;
        Ok(ReadOutcome::Record(record))
    }

    fn read_length(&mut self) -> CoreResult<LengthPrefix> {
        let mut decoder = VarintDecoder::new();
        let mut byte = [0u8; 1];
        loop {
            let read = match self.source.read(&mut byte) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // Some sources report exhaustion as an error.
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => 0,
                Err(e) => return Err(e.into()),
            };

            if read == 0 {
                if decoder.is_empty() {
                    return Ok(LengthPrefix::End);
                }
                return Ok(LengthPrefix::Torn(TruncationCause::PartialLength {
                    bytes_read: decoder.bytes_consumed(),
                }));
            }

            match decoder.push(byte[0]) {
                Ok(Some(size)) => {
                    return Ok(LengthPrefix::Value {
                        size,
                        header_len: decoder.bytes_consumed(),
                    })
                }
                Ok(None) => {}
                Err(e) => {
                    return Ok(LengthPrefix::Torn(TruncationCause::MalformedLength {
                        reason: e.to_string(),
                    }))
                }
            }
        }
    }

    /// Sequence number of the last record decoded, or
    /// [`SequenceNumber::UNSET`] if none has been.
    #[must_use]
    pub fn latest_sequence_number(&self) -> SequenceNumber {
        self.latest_sequence_number
    }

    /// Bytes from the start of the source through the end of the last
    /// decoded frame. After a truncated pass this is where new frames
    /// should be appended.
    #[must_use]
    pub fn valid_offset(&self) -> u64 {
        self.valid_offset
    }

    /// Number of records decoded so far.
    #[must_use]
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Why the pass ended truncated, if it did.
    #[must_use]
    pub fn truncation(&self) -> Option<&TruncationCause> {
        self.truncation.as_ref()
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Ends the pass and hands back the source so the caller can drop or
    /// reuse it.
    pub fn close(self) -> S {
        debug!(
            records = self.records_read,
            state = ?self.state,
            "closing journal reader"
        );
        self.source
    }

    /// Same as [`FrameReader::close`].
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<R: JournalRecord, S: Read> Iterator for FrameReader<R, S> {
    type Item = CoreResult<R>;

    /// Yields records until a clean end or a torn tail, or a single error
    /// if the source fails.
    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_terminal() {
            return None;
        }

        match self.next_record() {
            Ok(ReadOutcome::Record(record)) => Some(Ok(record)),
            Ok(ReadOutcome::EndOfStream | ReadOutcome::Truncated(_)) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R, S> std::fmt::Debug for FrameReader<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("scratch_capacity", &self.scratch.len())
            .field("latest_sequence_number", &self.latest_sequence_number)
            .field("valid_offset", &self.valid_offset)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Reads into `buf` until it is full or the source is exhausted.
///
/// Returns the number of bytes read. `UnexpectedEof` from the source counts
/// as exhaustion.
fn fill<S: Read + ?Sized>(source: &mut S, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
