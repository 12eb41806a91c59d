//! Benchmark utilities.

use metajournal_core::{FrameWriter, JournalEntry, SequenceNumber};
use rand::Rng;

/// Generate random payload bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate `count` entries with consecutive sequence numbers and random
/// payloads of `payload_size` bytes.
pub fn generate_entries(count: usize, payload_size: usize) -> Vec<JournalEntry> {
    (1..=count as u64)
        .map(|seq| JournalEntry::new(SequenceNumber::new(seq), random_data(payload_size)))
        .collect()
}

/// Write `entries` into an in-memory journal image.
pub fn journal_image(entries: &[JournalEntry]) -> Vec<u8> {
    let writer = FrameWriter::default();
    let mut image = Vec::new();
    for entry in entries {
        writer
            .write(entry, &mut image)
            .expect("writing to a Vec cannot fail");
    }
    image
}
