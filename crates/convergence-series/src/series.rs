//! Daily series and window types with axis validation guarantees.

use std::ops::Range;

use chrono::NaiveDate;

use crate::error::SeriesError;

/// Owned daily series: a strictly ascending date axis with one value per date.
///
/// Values may be NaN (a baseline-corrected day with no scored events). The
/// axis itself is always valid: no duplicates, ascending order, and exactly one
/// value per date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DailySeries {
    /// Create a new series from parallel date and value vectors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::LengthMismatch`] | `dates.len() != values.len()` |
    /// | [`SeriesError::DuplicateDate`] | A date appears more than once |
    /// | [`SeriesError::UnorderedDates`] | Dates are not ascending |
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                n_dates: dates.len(),
                n_values: values.len(),
            });
        }
        validate_axis(&dates)?;
        Ok(Self { dates, values })
    }

    /// Create a series from `(date, value)` pairs, validating the axis.
    ///
    /// # Errors
    ///
    /// Same as [`DailySeries::new`], minus the length check.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// Return the number of days on the axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Return true if the axis has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Return the ascending date axis.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Return the values, parallel to [`DailySeries::dates`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Return the positional index of `date`, if it is on the axis.
    #[must_use]
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Return the value recorded for `date`, if it is on the axis.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.position(date).map(|i| self.values[i])
    }

    /// Iterate over `(date, value)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Borrow a positional slice of the series.
    ///
    /// The range is clamped to the axis; an inverted or fully out-of-range
    /// request yields an empty window.
    #[must_use]
    pub fn window(&self, range: Range<usize>) -> Window<'_> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Window {
            dates: &self.dates[start..end],
            values: &self.values[start..end],
        }
    }

    /// Borrow the whole series as a window.
    #[must_use]
    pub fn as_window(&self) -> Window<'_> {
        self.window(0..self.len())
    }

    /// Return the calendar days missing between the first and last axis date.
    ///
    /// Positional windowing treats adjacent axis entries as adjacent days, so a
    /// non-empty result means window lengths in days and in entries differ.
    #[must_use]
    pub fn gaps(&self) -> Vec<NaiveDate> {
        self.dates
            .windows(2)
            .flat_map(|pair| {
                pair[0]
                    .iter_days()
                    .skip(1)
                    .take_while(move |d| *d < pair[1])
            })
            .collect()
    }

    /// Return true if every calendar day between the first and last date is present.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.dates
            .windows(2)
            .all(|pair| pair[0].succ_opt() == Some(pair[1]))
    }
}

fn validate_axis(dates: &[NaiveDate]) -> Result<(), SeriesError> {
    for (index, pair) in dates.windows(2).enumerate() {
        let (previous, date) = (pair[0], pair[1]);
        if date == previous {
            return Err(SeriesError::DuplicateDate {
                date,
                index: index + 1,
            });
        }
        if date < previous {
            return Err(SeriesError::UnorderedDates {
                index: index + 1,
                previous,
                date,
            });
        }
    }
    Ok(())
}

/// Borrowed, read-only contiguous slice of a [`DailySeries`]. Zero-copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<'a> {
    dates: &'a [NaiveDate],
    values: &'a [f64],
}

impl<'a> Window<'a> {
    /// Return the dates covered by the window.
    #[must_use]
    pub fn dates(&self) -> &'a [NaiveDate] {
        self.dates
    }

    /// Return the window values.
    #[must_use]
    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Return the number of days in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Return true if the window covers no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Return the first date of the window.
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Return the last date of the window.
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Arithmetic mean of the window, skipping NaN days.
    ///
    /// Returns NaN when the window is empty or every day is NaN.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let (sum, n) = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(sum, n), &v| (sum + v, n + 1));
        if n == 0 { f64::NAN } else { sum / n as f64 }
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + 'a {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}
