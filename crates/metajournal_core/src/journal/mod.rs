//! Length-delimited journal framing and recovery.
//!
//! ## Frame Format
//!
//! ```text
//! | payload length (varint, 1-10 bytes) | payload (N bytes) |
//! ```
//!
//! Frames are written back to back. There is no file header, footer,
//! index or checksum; a journal file is just `Frame*`.
//!
//! ## Recovery Policy
//!
//! A crash can leave the last frame partially written. Everything that can
//! go wrong with the final frame is reported as
//! [`ReadOutcome::Truncated`] and logged at warn level:
//!
//! - **Cut length prefix**: source ends inside the varint
//! - **Malformed length prefix**: varint longer than 10 bytes or overflowing
//! - **Oversized length**: above [`crate::FormatterConfig::max_frame_size`]
//! - **Cut payload**: fewer than `length` bytes remain
//! - **Undecodable payload**: the record decoder rejects the bytes
//!
//! Errors from the source itself (device or transport failures) propagate
//! as [`crate::CoreError::Io`]. A reader never skips a bad frame to look
//! for later ones: the valid prefix ends at the first frame that fails.
//!
//! ## Invariants
//!
//! - Frames are written in increasing sequence-number order
//! - A decoded record is never dropped
//! - Only the trailing frame is ever discarded, and never silently

mod formatter;
mod reader;
mod recovery;
mod writer;

pub use formatter::JournalFormatter;
pub use reader::{FrameReader, ReadOutcome, ReaderState, TruncationCause};
pub use recovery::{recover_backend, scan, RecoverySummary, StopReason, TruncateInfo};
pub use writer::FrameWriter;
