//! Recovery scans over a journal.
//!
//! A scan drives a [`FrameReader`] to its end and reports where the valid
//! prefix stops. [`recover_backend`] additionally cuts a torn tail off a
//! stored journal so the next append lands right after the last good frame.
//! A bad frame with data after it is never cut: the bytes are left for the
//! operator and reported in [`RecoverySummary::left_in_place`].

use crate::error::CoreResult;
use crate::journal::formatter::JournalFormatter;
use crate::journal::reader::{FrameReader, ReadOutcome, TruncationCause};
use crate::record::JournalRecord;
use crate::types::SequenceNumber;
use metajournal_storage::{BackendReader, StorageBackend, READ_CHUNK_SIZE};
use std::io::{BufReader, Read};
use tracing::{info, warn};

/// Why a scan stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The journal ended on a frame boundary.
    EndOfData,
    /// The journal ends with a discarded frame.
    Truncated(TruncationCause),
    /// The callback asked to stop.
    Stopped,
}

/// Result of a recovery scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverySummary {
    /// Records handed to the callback.
    pub records: u64,
    /// Sequence number of the last decoded record.
    pub latest_sequence_number: SequenceNumber,
    /// Length of the valid prefix in bytes.
    pub valid_len: u64,
    /// Why the scan stopped.
    pub stop: StopReason,
    /// Bytes after the valid prefix that [`recover_backend`] kept because
    /// the bad frame is not the tail. Always `None` from [`scan`].
    pub left_in_place: Option<TruncateInfo>,
}

impl RecoverySummary {
    /// Returns `true` if the journal ends with a discarded frame.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self.stop, StopReason::Truncated(_))
    }

    /// Returns what to cut from a journal of `total_len` bytes, if anything.
    ///
    /// Only a torn tail is cut: a frame that was cut short, or an
    /// undecodable frame that ends exactly at `total_len`.
    #[must_use]
    pub fn truncate_info(&self, total_len: u64) -> Option<TruncateInfo> {
        match &self.stop {
            StopReason::Truncated(cause)
                if self.valid_len < total_len && cause.is_tail(self.valid_len, total_len) =>
            {
                Some(self.discarded(total_len))
            }
            _ => None,
        }
    }

    /// Returns the unread bytes after a bad frame that is followed by more
    /// data, in a journal of `total_len` bytes.
    #[must_use]
    pub fn damaged_region(&self, total_len: u64) -> Option<TruncateInfo> {
        match &self.stop {
            StopReason::Truncated(cause)
                if self.valid_len < total_len && !cause.is_tail(self.valid_len, total_len) =>
            {
                Some(self.discarded(total_len))
            }
            _ => None,
        }
    }

    fn discarded(&self, total_len: u64) -> TruncateInfo {
        TruncateInfo {
            valid_end: self.valid_len,
            original_size: total_len,
        }
    }
}

/// Torn tail to remove from a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateInfo {
    /// Position where valid data ends.
    pub valid_end: u64,
    /// Journal size before truncation.
    pub original_size: u64,
}

impl TruncateInfo {
    /// Number of bytes to discard.
    #[must_use]
    pub fn bytes_to_truncate(&self) -> u64 {
        self.original_size - self.valid_end
    }
}

/// Reads `reader` to its end, handing each record to `callback`.
///
/// The callback returns `Ok(true)` to continue, `Ok(false)` to stop early,
/// or an error to abort the scan.
///
/// # Errors
///
/// Returns an error if the source fails or the callback returns one.
pub fn scan<R, S, F>(reader: &mut FrameReader<R, S>, mut callback: F) -> CoreResult<RecoverySummary>
where
    R: JournalRecord,
    S: Read,
    F: FnMut(R) -> CoreResult<bool>,
{
    let stop = loop {
        match reader.next_record()? {
            ReadOutcome::Record(record) => {
                if !callback(record)? {
                    break StopReason::Stopped;
                }
            }
            ReadOutcome::EndOfStream => break StopReason::EndOfData,
            ReadOutcome::Truncated(cause) => break StopReason::Truncated(cause),
        }
    };

    Ok(RecoverySummary {
        records: reader.records_read(),
        latest_sequence_number: reader.latest_sequence_number(),
        valid_len: reader.valid_offset(),
        stop,
        left_in_place: None,
    })
}

/// Replays the journal stored in `backend` and removes a torn tail.
///
/// If the scan ends on a torn tail the backend is cut back to the valid
/// prefix. If it ends on a bad frame with more data behind it, the backend
/// is left untouched and the region is reported in
/// [`RecoverySummary::left_in_place`]. A scan stopped by the callback
/// leaves the backend untouched.
///
/// # Errors
///
/// Returns an error if reading, the callback, or the truncation fails.
pub fn recover_backend<R, F>(
    backend: &mut dyn StorageBackend,
    formatter: &JournalFormatter,
    callback: F,
) -> CoreResult<RecoverySummary>
where
    R: JournalRecord,
    F: FnMut(R) -> CoreResult<bool>,
{
    let mut summary = {
        let source = BufReader::with_capacity(READ_CHUNK_SIZE, BackendReader::new(&*backend, 0));
        let mut reader = formatter.deserialize::<R, _>(source);
        scan(&mut reader, callback)?
    };

    let total_len = backend.size()?;
    if let Some(region) = summary.damaged_region(total_len) {
        warn!(
            valid_end = region.valid_end,
            original_size = region.original_size,
            unread = region.bytes_to_truncate(),
            last_sequence = summary.latest_sequence_number.as_u64(),
            "journal has a bad frame before its end; leaving it in place"
        );
        summary.left_in_place = Some(region);
    } else if let Some(info) = summary.truncate_info(total_len) {
        info!(
            valid_end = info.valid_end,
            original_size = info.original_size,
            discarded = info.bytes_to_truncate(),
            last_sequence = summary.latest_sequence_number.as_u64(),
            "truncating torn journal tail"
        );
        backend.truncate(info.valid_end)?;
    }

    Ok(summary)
}
