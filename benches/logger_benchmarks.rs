//! Criterion benchmarks for aelog

use aelog::facade::render_message;
use aelog::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use tempfile::TempDir;

/// Appender that discards everything, isolating dispatch cost
struct NullAppender;

impl Appender for NullAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        black_box(entry);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn null_logger(level: LogLevel) -> Logger {
    Logger::builder()
        .sink("null", LogLevel::Debug, NullAppender)
        .route("", level, ["null"])
        .build()
        .expect("null wiring builds")
}

// ============================================================================
// Message Preparation Benchmarks
// ============================================================================

fn bench_render_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_message");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single", |b| {
        b.iter(|| render_message(&[black_box(&"Server started")], " "));
    });

    group.bench_function("mixed_five", |b| {
        b.iter(|| {
            render_message(
                &[&"user", black_box(&42u32), &"performed", &"login", black_box(&1.5f64)],
                " ",
            )
        });
    });

    group.finish();
}

fn bench_log_entry_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_entry");
    group.throughput(Throughput::Elements(1));

    group.bench_function("plain", |b| {
        b.iter(|| LogEntry::new(LogLevel::Info, "bench", black_box("Simple message")));
    });

    group.bench_function("with_injection_escape", |b| {
        b.iter(|| LogEntry::new(LogLevel::Info, "bench", black_box("line one\nline two\tend")));
    });

    group.bench_function("with_location", |b| {
        b.iter(|| {
            LogEntry::new(LogLevel::Info, "bench", "located")
                .with_location(CallerLocation::new("src/main.rs", 42, "handle"))
        });
    });

    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let entry = LogEntry::new(LogLevel::Warning, "bench::fmt", "disk at 91 percent")
        .with_location(CallerLocation::new("src/disk.rs", 17, "check"));
    let plain = Formatter::default();
    let colored = Formatter::compile(&FormatterSpec::colored()).expect("default template");

    group.bench_function("plain", |b| b.iter(|| plain.format(black_box(&entry))));
    group.bench_function("colored", |b| b.iter(|| colored.format(black_box(&entry))));

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(LogLevel::Debug);
    let entry = LogEntry::new(LogLevel::Info, "bench", "dispatched");
    group.bench_function("admitted", |b| b.iter(|| logger.log_entry(black_box(&entry))));

    let filtering = null_logger(LogLevel::Error);
    group.bench_function("filtered", |b| b.iter(|| filtering.log_entry(black_box(&entry))));

    let registry = Registry::new();
    registry.install(null_logger(LogLevel::Debug));
    group.bench_function("through_registry", |b| b.iter(|| registry.log(black_box(&entry))));

    group.finish();
}

fn bench_file_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_logging");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = Registry::new();
    registry
        .configure(
            &LogOptions::new()
                .access_file(temp_dir.path().join("bench.log"))
                .max_bytes(4 * 1024 * 1024)
                .backup_count(1),
        )
        .expect("configure");
    let entry = LogEntry::new(LogLevel::Info, "bench", "written to disk");

    group.bench_function("rotating_file", |b| b.iter(|| registry.log(black_box(&entry))));

    group.finish();
}

fn bench_async_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_logging");
    group.throughput(Throughput::Elements(100));

    let registry = Arc::new(Registry::new());
    registry.install(null_logger(LogLevel::Debug));
    let pool = WorkerPool::new(4);

    group.bench_function("submit_and_wait_100", |b| {
        b.iter(|| {
            let handles: Vec<LogHandle> = (0..100)
                .map(|i| {
                    registry.log_async(&pool, LogEntry::new(LogLevel::Info, "bench", format!("job {}", i)))
                })
                .collect();
            for handle in handles {
                let _ = handle.wait();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_render_message,
    bench_log_entry_creation,
    bench_formatting,
    bench_dispatch,
    bench_file_logging,
    bench_async_logging,
);

criterion_main!(benches);
