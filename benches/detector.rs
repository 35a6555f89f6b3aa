//! Benchmarks for detector construction and queries.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seasonal_trends::prelude::*;

fn generate_rows(days: usize) -> Vec<InputRow> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    (0..days)
        .map(|i| {
            let seasonal = 50.0 * (2.0 * std::f64::consts::PI * i as f64 / 365.25).sin();
            let count = (200.0 + seasonal + (i % 7) as f64 * 3.0) as u64;
            InputRow::new(start + Duration::days(i as i64), count)
        })
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare");

    for days in [365, 1826, 3652].iter() {
        let rows = generate_rows(*days);
        group.bench_with_input(BenchmarkId::new("native_dates", days), days, |b, _| {
            b.iter(|| SeasonalTrendDetector::new(black_box(&rows)))
        });

        let text_rows: Vec<InputRow> = rows
            .iter()
            .map(|r| match &r.timestamp {
                seasonal_trends::core::DateValue::Date(d) => InputRow::new(d.to_string(), r.count),
                _ => r.clone(),
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("text_dates", days), days, |b, _| {
            b.iter(|| SeasonalTrendDetector::new(black_box(&text_rows)))
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let detector = SeasonalTrendDetector::new(&generate_rows(3652)).unwrap();

    group.bench_function("peak_months", |b| b.iter(|| black_box(&detector).peak_months()));
    group.bench_function("classical_decomposition", |b| {
        b.iter(|| black_box(&detector).detect_seasonal_pattern(12))
    });
    group.bench_function("stl_decomposition", |b| {
        b.iter(|| black_box(&detector).detect_seasonal_pattern_with(&Stl::new(), 12))
    });
    group.bench_function("anomalies", |b| b.iter(|| black_box(&detector).anomalies()));
    group.bench_function("summary", |b| b.iter(|| black_box(&detector).summary()));

    group.finish();
}

criterion_group!(benches, bench_construction, bench_queries);
criterion_main!(benches);
