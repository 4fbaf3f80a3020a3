//! Window extraction and delta computation.

use chrono::NaiveDate;
use convergence_series::{DailySeries, Window};
use tracing::{debug, instrument};

use crate::error::DeltaError;
use crate::mode::WindowMode;

/// Outcome of a delta computation: the scalar delta and the two windows it
/// was computed from.
///
/// Windows borrow from the source series. `delta` carries full precision;
/// rounding is left to whoever displays it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaResult<'a> {
    /// `mean(post) - mean(pre)`. NaN when either window has no finite mean.
    pub delta: f64,
    /// Window before the pivot.
    pub pre: Window<'a>,
    /// Window from the pivot (or the day before it) onward.
    pub post: Window<'a>,
    /// The pivot date the windows are anchored on.
    pub pivot: NaiveDate,
    /// Windowing mode used.
    pub mode: WindowMode,
}

impl DeltaResult<'_> {
    /// Mean of the pre window (NaN if empty).
    #[must_use]
    pub fn pre_mean(&self) -> f64 {
        self.pre.mean()
    }

    /// Mean of the post window (NaN if empty).
    #[must_use]
    pub fn post_mean(&self) -> f64 {
        self.post.mean()
    }

    /// Return true if the delta is a number.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        !self.delta.is_nan()
    }
}

/// Compute the pre/post delta of `series` around `pivot`.
///
/// With `include_day_before_in_post == false` the windows are
/// `pre = [i - pre_n, i)` and `post = [i, i + post_n)`, where `i` is the
/// pivot's position; with `true` both shift one day earlier:
/// `pre = [i - 1 - pre_n, i - 1)` and `post = [i - 1, i - 1 + post_n)`.
///
/// Near the edges of the axis nothing fails: a window whose start would fall
/// before the first date is empty, and a window running past the last date is
/// cut to what is available. An empty window has a NaN mean, so the delta is
/// NaN.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DeltaError::PivotNotFound`] | `pivot` is not on the series axis |
#[instrument(skip(series), fields(n_dates = series.len()))]
pub fn compute_delta(
    series: &DailySeries,
    pivot: NaiveDate,
    pre_n: usize,
    post_n: usize,
    include_day_before_in_post: bool,
) -> Result<DeltaResult<'_>, DeltaError> {
    let mode = WindowMode::from_include_day_before(include_day_before_in_post);
    let index = series.position(pivot).ok_or(DeltaError::PivotNotFound {
        date: pivot,
        n_dates: series.len(),
    })?;

    let empty = series.window(0..0);
    let (pre, post) = match index.checked_sub(mode.post_offset()) {
        Some(post_start) => {
            let pre = match post_start.checked_sub(pre_n) {
                Some(pre_start) => series.window(pre_start..post_start),
                None => empty,
            };
            let post = series.window(post_start..post_start.saturating_add(post_n));
            (pre, post)
        }
        None => (empty, empty),
    };

    let delta = post.mean() - pre.mean();
    debug!(
        pivot_index = index,
        pre_len = pre.len(),
        post_len = post.len(),
        delta,
        "delta computed"
    );

    Ok(DeltaResult {
        delta,
        pre,
        post,
        pivot,
        mode,
    })
}
