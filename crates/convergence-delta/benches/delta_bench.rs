//! Criterion benchmarks for convergence-delta: single delta and batch comparison.

use chrono::{Days, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};

use convergence_delta::{compare, DeltaConfig, SubjectInput};
use convergence_series::{DailySeries, Event, SeriesConfig};

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

fn make_events(n: usize, n_days: u64, phase: f64) -> Vec<Event> {
    (0..n)
        .map(|i| {
            let date = origin() + Days::new(i as u64 % n_days);
            Event::new(date, ((i as f64 + phase) * 0.37).sin().abs())
        })
        .collect()
}

fn bench_compute_delta(c: &mut Criterion) {
    let series = DailySeries::from_pairs(
        (0..365u64).map(|d| (origin() + Days::new(d), (d % 17) as f64)),
    )
    .unwrap();
    let pivot = origin() + Days::new(180);
    let cfg = DeltaConfig::default();

    c.bench_function("compute_delta_365d", |b| {
        b.iter(|| cfg.compute(&series, pivot).unwrap().delta);
    });
}

fn bench_compare(c: &mut Criterion) {
    let inputs: Vec<SubjectInput<usize>> = (0..100)
        .map(|key| SubjectInput {
            key,
            events: make_events(5_000, 30, key as f64),
            pivot: origin() + Days::new(15),
        })
        .collect();
    let series_cfg = SeriesConfig::default();
    let delta_cfg = DeltaConfig::default();

    c.bench_function("compare_100x5000", |b| {
        b.iter(|| compare(inputs.clone(), &series_cfg, &delta_cfg));
    });
}

criterion_group!(benches, bench_compute_delta, bench_compare);
criterion_main!(benches);
