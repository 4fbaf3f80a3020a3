//! Daily mention series construction.
//!
//! Pure data library with zero I/O. Turns a raw event log into a dense daily
//! count (or baseline-corrected proportion) series over the dates of the
//! unfiltered population, and exposes read-only windows into it.

mod builder;
mod error;
mod event;
mod series;

pub use builder::{base_dates, build_series, SeriesConfig};
pub use error::SeriesError;
pub use event::Event;
pub use series::{DailySeries, Window};
