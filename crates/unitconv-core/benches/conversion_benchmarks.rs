//! Benchmarks for path resolution and document rewriting
//!
//! Copyright (c) 2025 Unitconv Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use unitconv_core::{Conversion, Converter, JsonConverter, Quantity, TestFixture};

const DEFINITIONS: &str = include_str!("../tests/fixtures/converter.yml");
const DESK: &str = include_str!("../tests/fixtures/input.json");

/// A straight chain u0 -> u1 -> ... -> u{length}
fn chain_converter(length: usize) -> Converter {
    let conversions = (0..length)
        .map(|i| {
            Conversion::new(
                format!("u{}", i),
                format!("u{}", i + 1),
                "magnitude * 2",
                vec![TestFixture::new(1.0, 2.0)],
            )
        })
        .collect();

    Converter::new(conversions, vec![format!("u{}", length)]).expect("chain should build")
}

fn create_large_document(items: usize) -> String {
    let units = ["in", "ft", "mm", "m", "g", "lb", "oz"];
    let rows: Vec<Value> = (0..items)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Item {}", i),
                "size": {"magnitude": i as f64 * 1.5, "unit": units[i % units.len()]},
                "tags": ["a", "b"],
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({ "items": rows })).expect("document should serialize")
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for length in [2, 8, 24] {
        let converter = chain_converter(length);
        let to = format!("u{}", length);

        group.bench_with_input(BenchmarkId::new("cached", length), &to, |b, to| {
            b.iter(|| converter.resolve(black_box("u0"), black_box(to)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("build_and_resolve", length), &to, |b, to| {
            b.iter(|| chain_converter(length).resolve(black_box("u0"), black_box(to)).unwrap())
        });
    }

    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let converter = Converter::from_yaml_str(DEFINITIONS).unwrap();
    let quantity = Quantity::new(3.0, "oz");

    c.bench_function("convert_to_preferred_unit", |b| {
        b.iter(|| converter.convert_to_preferred_unit(black_box(&quantity)).unwrap())
    });
}

fn bench_rewrite(c: &mut Criterion) {
    let converter = JsonConverter::from_yaml_str(DEFINITIONS).unwrap();
    let mut group = c.benchmark_group("rewrite");

    group.bench_function("desk", |b| {
        b.iter(|| converter.convert_to_preferred_units(black_box(DESK)))
    });

    for items in [100, 1000] {
        let document = create_large_document(items);
        group.bench_with_input(BenchmarkId::new("items", items), &document, |b, document| {
            b.iter(|| converter.convert_to_preferred_units(black_box(document)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_convert, bench_rewrite);
criterion_main!(benches);
