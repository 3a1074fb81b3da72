//! Performance benchmarks for document encode/decode
//!
//! This benchmark suite evaluates:
//! - Throughput on string-heavy documents (deduplication path)
//! - Throughput on numeric arrays (VarInt path)
//! - Nested container traversal

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use objpack::{decode, encode};
use std::hint::black_box;

/// Generate documents for benchmarking
mod test_data {
    use objpack::Value;

    /// Records of repeated field names and a small vocabulary of values
    pub fn string_heavy(rows: usize) -> Value {
        let vocabulary = ["red", "green", "blue", "cyan", "magenta", "yellow"];
        Value::List(
            (0..rows)
                .map(|i| {
                    Value::map([
                        ("id", Value::Long(i as i64)),
                        ("color", Value::from(vocabulary[i % vocabulary.len()])),
                        ("label", Value::from(format!("row-{}", i % 64))),
                    ])
                })
                .collect(),
        )
    }

    /// Numeric arrays with mixed magnitudes
    pub fn numeric(len: usize) -> Value {
        let mut seed: u64 = 0x9E3779B97F4A7C15;
        let longs = (0..len)
            .map(|_| {
                // Linear congruential generator
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                (seed >> (seed % 48)) as i64
            })
            .collect();
        let doubles = (0..len).map(|i| i as f64 * 0.25).collect();
        Value::list([Value::LongArray(longs), Value::DoubleArray(doubles)])
    }

    /// Deeply nested lists
    pub fn nested(depth: usize) -> Value {
        let mut value = Value::Int(1);
        for _ in 0..depth {
            value = Value::List(vec![value, Value::Bool(true)]);
        }
        value
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let cases = [
        ("string_heavy", test_data::string_heavy(2_000)),
        ("numeric", test_data::numeric(16 * 1024)),
        ("nested", test_data::nested(256)),
    ];

    for (name, value) in &cases {
        let size = encode(value).map(|b| b.len()).unwrap_or(0);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), value, |b, value| {
            b.iter(|| encode(black_box(value)).unwrap());
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let cases = [
        ("string_heavy", test_data::string_heavy(2_000)),
        ("numeric", test_data::numeric(16 * 1024)),
        ("nested", test_data::nested(256)),
    ];

    for (name, value) in &cases {
        let bytes: Vec<u8> = encode(value).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
