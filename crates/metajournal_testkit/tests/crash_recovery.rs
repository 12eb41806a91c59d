//! Crashing mid-append, recovering, and appending again.

use metajournal_core::{
    recover_backend, CoreError, JournalEntry, JournalFormatter, JournalRecord, SequenceNumber,
    StopReason,
};
use metajournal_storage::{BackendReader, BackendWriter, InMemoryBackend, StorageBackend};
use metajournal_testkit::prelude::*;

fn append_all(
    backend: &mut dyn StorageBackend,
    formatter: &JournalFormatter,
    entries: &[JournalEntry],
) -> Result<(), CoreError> {
    let mut sink = BackendWriter::new(backend);
    for e in entries {
        formatter.serialize(e, &mut sink)?;
    }
    Ok(())
}

fn replay(backend: &mut dyn StorageBackend) -> (Vec<u64>, metajournal_core::RecoverySummary) {
    let mut seqs = Vec::new();
    let summary = recover_backend::<JournalEntry, _>(backend, &JournalFormatter::default(), |e| {
        seqs.push(e.sequence_number().as_u64());
        Ok(true)
    })
    .unwrap();
    (seqs, summary)
}

#[test]
fn crash_at_every_byte_of_final_frame() {
    let formatter = JournalFormatter::default();
    let committed = vec![entry(1, 10), entry(2, 10)];
    let (_, ends) = encode_journal(&[committed.clone(), vec![entry(3, 300)]].concat());
    let committed_len = ends[1];

    for crash_at in committed_len..ends[2] {
        let mut backend = CrashableBackend::new();
        backend.crash_after(crash_at);
        append_all(&mut backend, &formatter, &committed).unwrap();
        assert!(append_all(&mut backend, &formatter, &[entry(3, 300)]).is_err());
        assert!(backend.has_crashed());

        let mut restarted = backend.restart();
        let (seqs, summary) = replay(&mut restarted);
        assert_eq!(seqs, vec![1, 2], "crash at {crash_at}");
        assert_eq!(summary.latest_sequence_number, SequenceNumber::new(2));
        assert_eq!(restarted.size().unwrap(), committed_len, "crash at {crash_at}");
    }
}

#[test]
fn recovered_journal_accepts_new_frames() {
    let formatter = JournalFormatter::default();
    let mut backend = CrashableBackend::new();
    let (_, ends) = encode_journal(&entries(&[1, 2]));
    backend.crash_after(ends[1] - 3);

    assert!(append_all(&mut backend, &formatter, &entries(&[1, 2])).is_err());

    let mut restarted = backend.restart();
    let (seqs, summary) = replay(&mut restarted);
    assert_eq!(seqs, vec![1]);
    assert!(summary.is_truncated());

    // The journal writer resumes after the last good sequence number.
    let next = summary.latest_sequence_number.next().as_u64();
    append_all(&mut restarted, &formatter, &entries(&[next, next + 1])).unwrap();

    let (seqs, summary) = replay(&mut restarted);
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(summary.stop, StopReason::EndOfData);
}

#[test]
fn clean_journal_is_left_untouched() {
    let mut backend = InMemoryBackend::new();
    append_all(&mut backend, &JournalFormatter::default(), &entries(&[1, 2, 3])).unwrap();
    let before = backend.data();

    let (seqs, summary) = replay(&mut backend);
    assert_eq!(seqs, vec![1, 2, 3]);
    assert!(!summary.is_truncated());
    assert_eq!(backend.data(), before);
}

#[test]
fn device_error_is_not_truncation() {
    let mut backend = CrashableBackend::new();
    append_all(&mut backend, &JournalFormatter::default(), &entries(&[1, 2, 3])).unwrap();
    let (_, ends) = encode_journal(&entries(&[1, 2, 3]));
    backend.fail_reads_from(ends[1] + 1);
    let size = backend.size().unwrap();

    let result = recover_backend::<JournalEntry, _>(
        &mut backend,
        &JournalFormatter::default(),
        |_| Ok(true),
    );
    assert!(matches!(result, Err(CoreError::Io(_))));
    assert_eq!(backend.size().unwrap(), size);

    let back = read_back(BackendReader::new(&backend, 0));
    assert!(back.is_err());
}

#[test]
fn garbled_frame_mid_journal_is_left_in_place() {
    let (mut image, ends) = encode_journal(&entries(&[1, 2, 3, 4, 5]));
    image[ends[0] as usize + 1] = 0xFF;
    let mut backend = InMemoryBackend::with_data(image.clone());

    let (seqs, summary) = replay(&mut backend);
    assert_eq!(seqs, vec![1]);
    assert_eq!(summary.valid_len, ends[0]);
    let region = summary.left_in_place.unwrap();
    assert_eq!(region.valid_end, ends[0]);
    assert_eq!(region.original_size, image.len() as u64);
    assert_eq!(backend.size().unwrap(), image.len() as u64);
    assert_eq!(backend.data(), image);
}

#[test]
fn garbled_final_frame_is_cut() {
    let (mut image, ends) = encode_journal(&entries(&[1, 2, 3]));
    image[ends[1] as usize + 1] = 0xFF;
    let mut backend = InMemoryBackend::with_data(image);

    let (seqs, summary) = replay(&mut backend);
    assert_eq!(seqs, vec![1, 2]);
    assert!(summary.left_in_place.is_none());
    assert_eq!(backend.size().unwrap(), ends[1]);
}
