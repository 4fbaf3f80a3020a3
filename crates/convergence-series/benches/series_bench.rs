//! Criterion benchmarks for convergence-series: series construction with and
//! without baseline correction.

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use convergence_series::{base_dates, build_series, Event};

fn make_events(n: usize, n_days: u64) -> Vec<Event> {
    let origin = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let date = origin + Days::new(i as u64 % n_days);
            Event::new(date, (i as f64 * 0.37).sin().abs())
        })
        .collect()
}

fn bench_build_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_series");

    for &n in &[1_000usize, 10_000, 100_000] {
        let events = make_events(n, 60);
        let axis = base_dates(&events);
        for baseline in [false, true] {
            let id = BenchmarkId::new(format!("n{n}"), if baseline { "baseline" } else { "counts" });
            group.bench_with_input(id, &(&events, &axis), |b, (events, axis)| {
                b.iter(|| build_series(events, axis, 0.725, baseline).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_build_series);
criterion_main!(benches);
