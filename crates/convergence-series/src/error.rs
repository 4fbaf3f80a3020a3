//! Error types for series construction.

use chrono::NaiveDate;

/// Errors from daily series construction and validation.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Returned when the same date appears twice on a series axis.
    #[error("duplicate date {date} on series axis at index {index}")]
    DuplicateDate {
        /// The repeated date.
        date: NaiveDate,
        /// Position of the second occurrence.
        index: usize,
    },

    /// Returned when series dates are not in ascending order.
    #[error("series dates out of order at index {index}: {date} follows {previous}")]
    UnorderedDates {
        /// Position of the offending date.
        index: usize,
        /// The date at `index - 1`.
        previous: NaiveDate,
        /// The offending date.
        date: NaiveDate,
    },

    /// Returned when the date and value vectors differ in length.
    #[error("series has {n_dates} dates but {n_values} values")]
    LengthMismatch {
        /// Number of dates supplied.
        n_dates: usize,
        /// Number of values supplied.
        n_values: usize,
    },

    /// Returned when the similarity threshold is NaN or infinite.
    #[error("similarity threshold must be finite, got {value}")]
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },

    /// Returned when an event falls on a date that is not on the base axis.
    #[error("event dated {date} is not on the base date axis")]
    EventOutsideAxis {
        /// Date of the offending event.
        date: NaiveDate,
    },
}
