//! Series construction: threshold filtering, per-day counting, reindexing and
//! baseline correction.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::error::SeriesError;
use crate::event::Event;
use crate::series::DailySeries;

/// Return the distinct dates of an unfiltered event log, ascending.
///
/// This is the canonical base axis for [`build_series`]: it is derived from
/// the whole population, so filtering never changes the axis.
#[must_use]
pub fn base_dates(events: &[Event]) -> Vec<NaiveDate> {
    events
        .iter()
        .map(Event::date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build a daily series of convergent-event counts over `base_dates`.
///
/// Events with `similarity > threshold` are counted per date and reindexed over
/// `base_dates` (sorted ascending), with 0 on dates that have no such events.
/// With `baseline_correct`, each count is divided by the number of *scored*
/// events on that date; a date with no scored events becomes NaN. Unscored
/// events only place their date on the axis.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::InvalidThreshold`] | `threshold` is NaN or infinite |
/// | [`SeriesError::DuplicateDate`] | `base_dates` contains a date twice |
/// | [`SeriesError::EventOutsideAxis`] | An event date is missing from `base_dates` |
#[instrument(skip_all, fields(n_events = events.len(), n_dates = base_dates.len(), threshold = threshold, baseline_correct = baseline_correct))]
pub fn build_series(
    events: &[Event],
    base_dates: &[NaiveDate],
    threshold: f64,
    baseline_correct: bool,
) -> Result<DailySeries, SeriesError> {
    if !threshold.is_finite() {
        return Err(SeriesError::InvalidThreshold { value: threshold });
    }

    let mut axis = base_dates.to_vec();
    axis.sort_unstable();
    if let Some(index) = axis.windows(2).position(|pair| pair[0] == pair[1]) {
        return Err(SeriesError::DuplicateDate {
            date: axis[index],
            index: index + 1,
        });
    }

    // date -> (kept, scored)
    let mut tallies: BTreeMap<NaiveDate, (u64, u64)> =
        axis.iter().map(|&d| (d, (0, 0))).collect();
    for event in events {
        let tally = tallies
            .get_mut(&event.date())
            .ok_or(SeriesError::EventOutsideAxis { date: event.date() })?;
        if event.similarity().is_some() {
            tally.1 += 1;
        }
        if event.exceeds(threshold) {
            tally.0 += 1;
        }
    }

    let values: Vec<f64> = tallies
        .values()
        .map(|&(kept, scored)| {
            if baseline_correct {
                // 0/0 -> NaN for days with no scored events
                kept as f64 / scored as f64
            } else {
                kept as f64
            }
        })
        .collect();

    let series = DailySeries::new(axis, values)?;
    if !series.is_contiguous() {
        warn!(
            n_missing_days = series.gaps().len(),
            "base axis has calendar gaps; windows are positional"
        );
    }
    debug!(n_days = series.len(), "series built");
    Ok(series)
}

/// Configuration for building a [`DailySeries`] from a raw event log.
///
/// Construct via [`SeriesConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter          | Default |
/// |--------------------|---------|
/// | `baseline_correct` | false   |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesConfig {
    threshold: f64,
    baseline_correct: bool,
}

impl SeriesConfig {
    /// Default similarity threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.725;

    /// Create a configuration that counts events scoring strictly above `threshold`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::InvalidThreshold`] | `threshold` is NaN or infinite |
    pub fn new(threshold: f64) -> Result<Self, SeriesError> {
        if !threshold.is_finite() {
            return Err(SeriesError::InvalidThreshold { value: threshold });
        }
        Ok(Self {
            threshold,
            baseline_correct: false,
        })
    }

    /// Divide each day's count by that day's scored event count.
    #[must_use]
    pub fn with_baseline_correction(mut self, baseline_correct: bool) -> Self {
        self.baseline_correct = baseline_correct;
        self
    }

    /// Return the similarity threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return whether baseline correction is enabled.
    #[must_use]
    pub fn baseline_correct(&self) -> bool {
        self.baseline_correct
    }

    /// Build the series for `events`, using their own distinct dates as the axis.
    ///
    /// # Errors
    ///
    /// See [`build_series`]. With a derived axis only threshold validation can fail.
    pub fn build(&self, events: &[Event]) -> Result<DailySeries, SeriesError> {
        build_series(events, &base_dates(events), self.threshold, self.baseline_correct)
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            baseline_correct: false,
        }
    }
}
