//! Formatter tying writer and reader to one configuration.

use crate::config::FormatterConfig;
use crate::error::CoreResult;
use crate::journal::reader::FrameReader;
use crate::journal::writer::FrameWriter;
use crate::record::JournalRecord;
use std::io::{Read, Write};

/// Reads and writes length-delimited journal frames.
///
/// A formatter is immutable and can be shared across threads; every
/// [`JournalFormatter::deserialize`] call creates a reader with its own
/// buffer and cursor.
#[derive(Debug, Clone, Default)]
pub struct JournalFormatter {
    config: FormatterConfig,
    writer: FrameWriter,
}

impl JournalFormatter {
    /// Creates a formatter from `config`.
    #[must_use]
    pub fn new(config: FormatterConfig) -> Self {
        let writer = FrameWriter::new(&config);
        Self { config, writer }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Writes `record` to `sink` as one frame.
    ///
    /// # Errors
    ///
    /// See [`FrameWriter::write`].
    pub fn serialize<R, W>(&self, record: &R, sink: &mut W) -> CoreResult<usize>
    where
        R: JournalRecord,
        W: Write + ?Sized,
    {
        self.writer.write(record, sink)
    }

    /// Starts a read pass over `source`.
    pub fn deserialize<R, S>(&self, source: S) -> FrameReader<R, S>
    where
        R: JournalRecord,
        S: Read,
    {
        FrameReader::with_config(source, &self.config)
    }
}
