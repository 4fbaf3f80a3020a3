use chrono::NaiveDate;
use convergence_series::SeriesError;

/// Errors from delta computation.
#[derive(Debug, thiserror::Error)]
pub enum DeltaError {
    /// Returned when the pivot date is not on the series axis.
    #[error("pivot date {date} is not on the series axis ({n_dates} dates)")]
    PivotNotFound {
        /// The requested pivot date.
        date: NaiveDate,
        /// Length of the axis that was searched.
        n_dates: usize,
    },

    /// Returned when a window size falls outside the bounds of its mode.
    #[error("{window} window of {size} days is outside {min}..={max}")]
    WindowOutOfBounds {
        /// Which window: "pre" or "post".
        window: &'static str,
        /// The rejected size.
        size: usize,
        /// Smallest accepted size.
        min: usize,
        /// Largest accepted size.
        max: usize,
    },

    /// Wraps a series construction error raised during a batch comparison.
    #[error("series construction failed: {0}")]
    Series(#[from] SeriesError),
}
