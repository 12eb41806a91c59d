//! # metajournal core
//!
//! Framing and recovery for an append-only metadata journal.
//!
//! This crate provides:
//! - [`FrameWriter`]: writes one record as a varint-length-prefixed frame
//! - [`FrameReader`]: reads frames back, tolerating a torn final frame
//! - [`JournalFormatter`]: both directions bound to one [`FormatterConfig`]
//! - [`scan`] and [`recover_backend`]: recovery passes over a journal
//! - [`JournalEntry`]: a reference record type
//!
//! Record schemas plug in through [`JournalRecord`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entry;
mod error;
pub mod journal;
mod record;
mod types;

pub use config::{FormatterConfig, DEFAULT_MAX_FRAME_SIZE, DEFAULT_SCRATCH_CAPACITY};
pub use entry::JournalEntry;
pub use error::{CoreError, CoreResult};
pub use journal::{
    recover_backend, scan, FrameReader, FrameWriter, JournalFormatter, ReadOutcome, ReaderState,
    RecoverySummary, StopReason, TruncateInfo, TruncationCause,
};
pub use record::JournalRecord;
pub use types::SequenceNumber;
