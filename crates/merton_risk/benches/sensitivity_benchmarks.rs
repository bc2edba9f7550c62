//! Criterion benchmarks for the sensitivity engine.
//!
//! Benchmarks cover:
//! - A single volatility grid
//! - The full report (two grids, stress scenarios, robustness)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use merton_core::types::MarketInputs;
use merton_risk::sensitivity::SensitivityEngine;

fn reference_firms() -> Vec<(&'static str, MarketInputs)> {
    [
        ("safe", (3e12, 0.25, 1e11, 0.045, 1.0)),
        ("moderate", (100.0, 0.40, 80.0, 0.05, 1.0)),
        ("distressed", (5e8, 0.95, 8e9, 0.045, 1.0)),
    ]
    .into_iter()
    .filter_map(|(name, (e, vol, d, r, t))| {
        MarketInputs::new(e, vol, d, r, t).ok().map(|i| (name, i))
    })
    .collect()
}

fn bench_volatility_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitivity_grid");

    for (name, inputs) in reference_firms() {
        let engine = SensitivityEngine::new(inputs);
        group.bench_function(BenchmarkId::new("volatility", name), |b| {
            b.iter(|| black_box(&engine).volatility_sensitivity());
        });
    }

    group.finish();
}

fn bench_full_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitivity_report");
    group.sample_size(20);

    for (name, inputs) in reference_firms() {
        let engine = SensitivityEngine::new(inputs);
        group.bench_function(BenchmarkId::new("generate_report", name), |b| {
            b.iter(|| engine.generate_report(black_box(200.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_volatility_grid, bench_full_report);
criterion_main!(benches);
