//! Property checks for series construction on seeded random event logs.
//!
//! These tests pin the axis and filtering invariants the delta engine relies
//! on: the axis never depends on the threshold, and raising the threshold
//! never raises a day's count.

use chrono::{Days, NaiveDate};
use convergence_series::{base_dates, build_series, Event, SeriesConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

/// Random event log over a 30-day span with roughly 1 in 10 events unscored.
fn random_events(seed: u64, n: usize) -> Vec<Event> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let origin = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
    (0..n)
        .map(|_| {
            let date = origin + Days::new(rng.gen_range(0..30));
            if rng.gen_bool(0.1) {
                Event::unscored(date)
            } else {
                Event::new(date, rng.gen_range(0.0..1.0))
            }
        })
        .collect()
}

const THRESHOLDS: [f64; 6] = [0.0, 0.5, 0.6, 0.725, 0.85, 1.0];

#[test]
fn axis_length_is_independent_of_threshold() {
    for seed in 0..10 {
        let events = random_events(seed, 200);
        let axis = base_dates(&events);
        for &t in &THRESHOLDS {
            let s = build_series(&events, &axis, t, false).unwrap();
            assert_eq!(s.len(), axis.len(), "seed {seed}, threshold {t}");
            assert_eq!(s.dates(), axis.as_slice());
        }
    }
}

#[test]
fn raising_threshold_never_raises_counts() {
    for seed in 0..10 {
        let events = random_events(seed, 300);
        let axis = base_dates(&events);
        let mut previous: Option<Vec<f64>> = None;
        for &t in &THRESHOLDS {
            let s = build_series(&events, &axis, t, false).unwrap();
            if let Some(prev) = &previous {
                for (i, (&before, &after)) in prev.iter().zip(s.values()).enumerate() {
                    assert!(
                        after <= before,
                        "seed {seed}: day {i} rose from {before} to {after} at threshold {t}"
                    );
                }
            }
            previous = Some(s.values().to_vec());
        }
    }
}

#[test]
fn counts_sum_to_events_above_threshold() {
    let events = random_events(7, 500);
    let s = SeriesConfig::new(0.725).unwrap().build(&events).unwrap();
    let expected = events.iter().filter(|e| e.exceeds(0.725)).count() as f64;
    let total: f64 = s.values().iter().sum();
    assert_eq!(total, expected);
}

#[test]
fn proportions_stay_in_unit_interval() {
    let events = random_events(11, 400);
    let s = SeriesConfig::new(0.5)
        .unwrap()
        .with_baseline_correction(true)
        .build(&events)
        .unwrap();
    // NaN only where a day holds nothing but unscored events.
    for (date, p) in s.iter() {
        if p.is_nan() {
            assert!(
                events.iter().filter(|e| e.date() == date).all(|e| e.similarity().is_none()),
                "{date}: NaN on a day with scored events"
            );
            continue;
        }
        assert!((0.0..=1.0).contains(&p), "{date}: proportion {p} outside [0, 1]");
    }
}
