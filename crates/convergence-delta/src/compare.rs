//! Batch comparison: one delta per subject, ranked.

use std::cmp::Ordering;

use chrono::NaiveDate;
use convergence_series::{Event, SeriesConfig};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::config::DeltaConfig;
use crate::error::DeltaError;

/// One subject's raw input to a batch comparison.
#[derive(Debug, Clone)]
pub struct SubjectInput<K> {
    /// Caller-chosen subject key, carried through to the output.
    pub key: K,
    /// The subject's unfiltered event log.
    pub events: Vec<Event>,
    /// The subject's pivot date (typically its release date).
    pub pivot: NaiveDate,
}

/// One ranked row of a batch comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectDelta<K> {
    /// The subject key.
    pub key: K,
    /// `post_mean - pre_mean`, full precision, possibly NaN.
    pub delta: f64,
    /// Mean of the pre window.
    pub pre_mean: f64,
    /// Mean of the post window.
    pub post_mean: f64,
    /// Number of days in the pre window.
    pub pre_len: usize,
    /// Number of days in the post window.
    pub post_len: usize,
}

/// A subject whose delta could not be computed.
#[derive(Debug)]
pub struct SubjectFailure<K> {
    /// The subject key.
    pub key: K,
    /// Why the computation failed.
    pub error: DeltaError,
}

/// Result of a batch comparison.
#[derive(Debug)]
pub struct Comparison<K> {
    /// Subjects ordered by delta, largest first; NaN deltas last.
    pub ranked: Vec<SubjectDelta<K>>,
    /// Subjects that failed, in input order.
    pub failures: Vec<SubjectFailure<K>>,
}

impl<K> Comparison<K> {
    /// Return the number of subjects processed, including failures.
    #[must_use]
    pub fn n_subjects(&self) -> usize {
        self.ranked.len() + self.failures.len()
    }
}

/// Compute the delta of every subject with the same parameters and rank them.
///
/// Subjects are independent, so the work runs in parallel on the rayon pool.
/// A subject that fails (e.g. its pivot date is absent from its own event
/// log) is reported in [`Comparison::failures`] and does not abort the batch.
/// Ties keep input order.
#[instrument(skip_all, fields(n_subjects = inputs.len()))]
pub fn compare<K: Send>(
    inputs: Vec<SubjectInput<K>>,
    series_config: &SeriesConfig,
    delta_config: &DeltaConfig,
) -> Comparison<K> {
    let outcomes: Vec<Result<SubjectDelta<K>, SubjectFailure<K>>> = inputs
        .into_par_iter()
        .map(|input| {
            let SubjectInput { key, events, pivot } = input;
            let computed = series_config
                .build(&events)
                .map_err(DeltaError::from)
                .and_then(|series| {
                    let r = delta_config.compute(&series, pivot)?;
                    Ok((r.delta, r.pre_mean(), r.post_mean(), r.pre.len(), r.post.len()))
                });
            match computed {
                Ok((delta, pre_mean, post_mean, pre_len, post_len)) => Ok(SubjectDelta {
                    key,
                    delta,
                    pre_mean,
                    post_mean,
                    pre_len,
                    post_len,
                }),
                Err(error) => Err(SubjectFailure { key, error }),
            }
        })
        .collect();

    let mut ranked = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(row) => ranked.push(row),
            Err(failure) => {
                warn!(error = %failure.error, "subject skipped");
                failures.push(failure);
            }
        }
    }
    ranked.sort_by(|a, b| rank_order(a.delta, b.delta));

    info!(
        n_ranked = ranked.len(),
        n_failed = failures.len(),
        n_undefined = ranked.iter().filter(|r| r.delta.is_nan()).count(),
        "comparison complete"
    );
    Comparison { ranked, failures }
}

/// Descending by delta with NaN after every number. `0.0` and `-0.0` are equal.
fn rank_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_order_puts_nan_last() {
        let mut v = vec![0.5, f64::NAN, 2.0, -1.0, f64::NAN, 1.0];
        v.sort_by(|a, b| rank_order(*a, *b));
        assert_eq!(&v[..4], &[2.0, 1.0, 0.5, -1.0]);
        assert!(v[4].is_nan() && v[5].is_nan());
    }

    #[test]
    fn signed_zero_deltas_tie_in_input_order() {
        assert_eq!(rank_order(-0.0, 0.0), Ordering::Equal);

        let mut rows = vec![("a", -0.0), ("b", 0.0), ("c", 1.0), ("d", -0.0)];
        rows.sort_by(|x, y| rank_order(x.1, y.1));
        let keys: Vec<&str> = rows.iter().map(|r| r.0).collect();
        assert_eq!(keys, vec!["c", "a", "b", "d"]);
    }
}
