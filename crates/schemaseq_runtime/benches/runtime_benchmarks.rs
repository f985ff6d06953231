//! Benchmarks for script application and session snapshots.
//!
//! Run with: `cargo bench --package schemaseq_runtime`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use schemaseq_foundation::Result;
use schemaseq_runtime::snapshot::{from_bytes, to_bytes};
use schemaseq_runtime::{Executor, ScriptApplier, Session};
use schemaseq_sql::{ParserConfig, Statement};

// =============================================================================
// Helper Functions
// =============================================================================

/// Discards every statement.
struct NullExecutor;

impl Executor for NullExecutor {
    fn execute(&mut self, _statement: &Statement) -> Result<u64> {
        Ok(0)
    }
}

fn script(tables: usize) -> String {
    let mut text = String::new();
    for i in 0..tables {
        text.push_str(&format!("create table t{i} (id number primary key);\n"));
        text.push_str(&format!("insert into t{i} values (1);\n"));
        text.push_str(&format!("create or replace synonym s{i} for t{i};\n"));
    }
    text
}

fn session(tables: usize) -> Session {
    let mut session = Session::with_config(ParserConfig::structural().with_owner("bench"));
    let _ = session.eval(&script(tables));
    session
}

// =============================================================================
// Applier Benchmarks
// =============================================================================

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for tables in [10, 100] {
        let input = script(tables);
        group.throughput(Throughput::Elements(tables as u64 * 3));
        group.bench_with_input(BenchmarkId::new("tables", tables), &input, |b, s| {
            let applier = ScriptApplier::new().with_owner("bench");
            b.iter(|| applier.apply(black_box(s), &mut NullExecutor))
        });
    }

    group.finish();
}

// =============================================================================
// Snapshot Benchmarks
// =============================================================================

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for tables in [10, 100] {
        let snapshot = session(tables).snapshot();
        group.bench_with_input(BenchmarkId::new("serialize", tables), &snapshot, |b, s| {
            b.iter(|| to_bytes(black_box(s)))
        });

        let bytes = to_bytes(&snapshot).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("deserialize", tables), &bytes, |b, s| {
            b.iter(|| from_bytes(black_box(s)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply, bench_snapshot);
criterion_main!(benches);
