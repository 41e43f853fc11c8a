//! Performance benchmarks for tirea-mutable operations.
//!
//! Run with: cargo bench --package tirea-mutable

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde::{Deserialize, Serialize};
use tirea_mutable::{Mutable, Tracker};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
struct Engine {
    #[serde(skip)]
    tracker: Tracker<Engine>,
    pub power: u32,
    pub fuel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
struct Car {
    #[serde(skip)]
    tracker: Tracker<Car>,
    pub color: String,
    pub doors: u8,
    pub price: f64,
    pub tags: Vec<String>,
    #[mutable(deep)]
    pub engine: Engine,
    #[mutable(nested)]
    pub spares: Vec<Engine>,
}

/// Generate a car with `num_spares` trackable engines in a collection member
fn generate_car(num_spares: usize) -> Car {
    Car {
        color: "red".into(),
        doors: 4,
        price: 19_999.0,
        tags: vec!["sport".into(), "hatchback".into()],
        spares: (0..num_spares)
            .map(|i| Engine {
                power: i as u32,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

// ============================================================================
// Benchmark: reset with varying collection sizes
// ============================================================================

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("reset");

    for size in [0, 10, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut car = generate_car(size);
            b.iter(|| {
                car.reset().unwrap();
                black_box(&car);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: analyze_changes
// ============================================================================

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_changes");

    group.bench_function("unchanged", |b| {
        let mut car = generate_car(10);
        car.reset().unwrap();
        b.iter(|| black_box(car.analyze_changes()));
    });

    group.bench_function("flat_and_deep_changes", |b| {
        let mut car = generate_car(10);
        car.reset().unwrap();
        car.color = "blue".into();
        car.price = 17_500.0;
        car.engine.power = 250;
        b.iter(|| black_box(car.analyze_changes()));
    });

    group.finish();
}

// ============================================================================
// Benchmark: set_value by coercion path
// ============================================================================

fn bench_set_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_value");

    group.bench_function("exact_type", |b| {
        let mut car = generate_car(0);
        b.iter(|| car.set_value(black_box("doors"), 5u8).unwrap());
    });

    group.bench_function("parsed_string", |b| {
        let mut car = generate_car(0);
        b.iter(|| car.set_value(black_box("price"), "18250.5").unwrap());
    });

    group.bench_function("nested_path", |b| {
        let mut car = generate_car(0);
        b.iter(|| car.set_value(black_box("engine/power"), 300u32).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_reset, bench_analyze, bench_set_value);
criterion_main!(benches);
