//! Frame write and read benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use metajournal_bench::{generate_entries, journal_image};
use metajournal_core::{
    recover_backend, FormatterConfig, FrameReader, FrameWriter, JournalEntry, JournalFormatter,
    ReadOutcome,
};
use metajournal_storage::{BackendWriter, InMemoryBackend};

const ENTRY_COUNT: usize = 1_000;

/// Benchmark framing entries into a Vec sink.
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for payload_size in [64, 1024, 16 * 1024] {
        let entries = generate_entries(ENTRY_COUNT, payload_size);
        group.throughput(Throughput::Bytes((ENTRY_COUNT * payload_size) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(payload_size),
            &entries,
            |b, entries| {
                let writer = FrameWriter::default();
                b.iter(|| {
                    let mut sink = Vec::new();
                    for entry in entries {
                        writer.write(black_box(entry), &mut sink).unwrap();
                    }
                    black_box(sink);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark reading a journal back.
///
/// The 16 KiB case exceeds the default scratch buffer and takes the
/// one-off allocation path.
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for payload_size in [64, 1024, 16 * 1024] {
        let image = journal_image(&generate_entries(ENTRY_COUNT, payload_size));
        group.throughput(Throughput::Bytes(image.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(payload_size),
            &image,
            |b, image| {
                b.iter(|| {
                    let mut reader = FrameReader::<JournalEntry, _>::new(black_box(image.as_slice()));
                    let mut count = 0usize;
                    while let ReadOutcome::Record(entry) = reader.next_record().unwrap() {
                        black_box(entry);
                        count += 1;
                    }
                    assert_eq!(count, ENTRY_COUNT);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the effect of the scratch capacity on 4 KiB payloads.
fn bench_scratch_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("scratch_capacity");
    let image = journal_image(&generate_entries(ENTRY_COUNT, 4096));
    group.throughput(Throughput::Bytes(image.len() as u64));

    for capacity in [1024, 8192] {
        let config = FormatterConfig::new().scratch_capacity(capacity);
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &image, |b, image| {
            b.iter(|| {
                let reader = FrameReader::<JournalEntry, _>::with_config(image.as_slice(), &config);
                black_box(reader.map(|r| r.unwrap()).count());
            });
        });
    }

    group.finish();
}

/// Benchmark recovering a torn journal from an in-memory backend.
fn bench_recover(c: &mut Criterion) {
    let formatter = JournalFormatter::default();
    let mut image = journal_image(&generate_entries(ENTRY_COUNT, 256));
    image.truncate(image.len() - 10);

    c.bench_function("recover_torn_backend", |b| {
        b.iter(|| {
            let mut backend = InMemoryBackend::with_data(image.clone());
            let summary =
                recover_backend::<JournalEntry, _>(&mut backend, &formatter, |_| Ok(true)).unwrap();
            black_box(summary);
        });
    });

    c.bench_function("append_to_backend", |b| {
        let entries = generate_entries(100, 256);
        b.iter(|| {
            let mut backend = InMemoryBackend::new();
            let mut sink = BackendWriter::new(&mut backend);
            for entry in &entries {
                formatter.serialize(entry, &mut sink).unwrap();
            }
            black_box(sink.bytes_written());
        });
    });
}

criterion_group!(
    benches,
    bench_write,
    bench_read,
    bench_scratch_capacity,
    bench_recover
);
criterion_main!(benches);
