//! Property-based test generators using proptest.

use metajournal_core::{JournalEntry, SequenceNumber, DEFAULT_SCRATCH_CAPACITY};
use proptest::prelude::*;

/// Strategy for payloads on both sides of the reader's scratch capacity.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..DEFAULT_SCRATCH_CAPACITY * 2)
}

/// Strategy for journals of up to `max_entries` entries with strictly
/// increasing sequence numbers starting above zero.
pub fn journal_strategy(max_entries: usize) -> impl Strategy<Value = Vec<JournalEntry>> {
    prop::collection::vec((1u64..1_000, payload_strategy()), 0..=max_entries).prop_map(|items| {
        let mut seq = 0u64;
        items
            .into_iter()
            .map(|(gap, payload)| {
                seq += gap;
                JournalEntry::new(SequenceNumber::new(seq), payload)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use metajournal_core::JournalRecord;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn journals_are_strictly_increasing(journal in journal_strategy(16)) {
            prop_assert!(journal
                .windows(2)
                .all(|w| w[0].sequence_number() < w[1].sequence_number()));
            prop_assert!(journal.iter().all(|e| !e.sequence_number().is_unset()));
        }
    }
}
