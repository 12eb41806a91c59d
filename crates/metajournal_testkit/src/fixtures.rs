//! Journal fixtures and read-back helpers.

use metajournal_core::{
    CoreResult, FrameReader, FrameWriter, JournalEntry, ReadOutcome, ReaderState,
    SequenceNumber, TruncationCause,
};
use std::io::Read;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds an entry whose payload is `len` copies of the low byte of `seq`.
#[must_use]
pub fn entry(seq: u64, len: usize) -> JournalEntry {
    JournalEntry::new(SequenceNumber::new(seq), vec![seq as u8; len])
}

/// Builds entries with the given sequence numbers and small payloads.
#[must_use]
pub fn entries(seqs: &[u64]) -> Vec<JournalEntry> {
    seqs.iter().map(|&seq| entry(seq, 8)).collect()
}

/// Writes `entries` into one journal image.
///
/// Returns the image and the end offset of every frame.
#[must_use]
pub fn encode_journal(entries: &[JournalEntry]) -> (Vec<u8>, Vec<u64>) {
    let writer = FrameWriter::default();
    let mut journal = Vec::new();
    let mut ends = Vec::with_capacity(entries.len());
    for e in entries {
        writer
            .write(e, &mut journal)
            .expect("writing to a Vec cannot fail");
        ends.push(journal.len() as u64);
    }
    (journal, ends)
}

/// Everything one read pass produced.
#[derive(Debug)]
pub struct ReadBack {
    /// Records in the order they were read.
    pub entries: Vec<JournalEntry>,
    /// Reader's latest sequence number at the end of the pass.
    pub latest: SequenceNumber,
    /// Reader's valid offset at the end of the pass.
    pub valid_offset: u64,
    /// Reader's final state.
    pub state: ReaderState,
    /// Truncation cause, if the pass ended truncated.
    pub truncation: Option<TruncationCause>,
}

/// Reads `source` to its end with a default reader.
///
/// # Errors
///
/// Returns the reader's error if the source fails.
pub fn read_back<S: Read>(source: S) -> CoreResult<ReadBack> {
    let mut reader = FrameReader::<JournalEntry, _>::new(source);
    let mut entries = Vec::new();
    while let ReadOutcome::Record(e) = reader.next_record()? {
        entries.push(e);
    }
    Ok(ReadBack {
        entries,
        latest: reader.latest_sequence_number(),
        valid_offset: reader.valid_offset(),
        state: reader.state(),
        truncation: reader.truncation().cloned(),
    })
}

/// A journal file path inside a temporary directory.
///
/// The directory is removed when this value is dropped.
pub struct TempJournal {
    dir: TempDir,
}

impl TempJournal {
    /// Creates a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path of the journal file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("journal.log")
    }
}

impl Default for TempJournal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_ends_cover_image() {
        let (journal, ends) = encode_journal(&entries(&[1, 2, 3]));
        assert_eq!(ends.len(), 3);
        assert_eq!(*ends.last().unwrap(), journal.len() as u64);
        assert!(ends.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn read_back_clean_image() {
        let written = entries(&[4, 5]);
        let (journal, _) = encode_journal(&written);
        let back = read_back(journal.as_slice()).unwrap();
        assert_eq!(back.entries, written);
        assert_eq!(back.latest, SequenceNumber::new(5));
        assert_eq!(back.state, ReaderState::Exhausted { truncated: false });
    }
}
