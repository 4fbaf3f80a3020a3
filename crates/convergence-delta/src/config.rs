//! Configuration builder for delta computation.

use chrono::NaiveDate;
use convergence_series::DailySeries;

use crate::engine::{compute_delta, DeltaResult};
use crate::error::DeltaError;
use crate::mode::WindowMode;

/// Configuration for pre/post delta computation.
///
/// Construct via [`DeltaConfig::new`] or [`DeltaConfig::for_mode`], then chain
/// `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter | Default                    |
/// |-----------|----------------------------|
/// | `mode`    | [`WindowMode::PivotFirst`] |
///
/// [`DeltaConfig::for_mode`] additionally takes both window sizes from
/// [`WindowMode::pre_bounds`] and [`WindowMode::post_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaConfig {
    pre_n: usize,
    post_n: usize,
    mode: WindowMode,
}

impl DeltaConfig {
    /// Create a configuration with the given window sizes in days.
    ///
    /// Sizes are not checked against the mode bounds here; a zero size yields
    /// an empty window and a NaN delta. Use [`DeltaConfig::check_bounds`] to
    /// validate user input.
    #[must_use]
    pub fn new(pre_n: usize, post_n: usize) -> Self {
        Self {
            pre_n,
            post_n,
            mode: WindowMode::PivotFirst,
        }
    }

    /// Create a configuration with the default window sizes of `mode`.
    #[must_use]
    pub fn for_mode(mode: WindowMode) -> Self {
        Self {
            pre_n: mode.pre_bounds().default,
            post_n: mode.post_bounds().default,
            mode,
        }
    }

    /// Set the windowing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: WindowMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the pre-window size in days.
    #[must_use]
    pub fn with_pre_n(mut self, pre_n: usize) -> Self {
        self.pre_n = pre_n;
        self
    }

    /// Set the post-window size in days.
    #[must_use]
    pub fn with_post_n(mut self, post_n: usize) -> Self {
        self.post_n = post_n;
        self
    }

    /// Return the pre-window size.
    #[must_use]
    pub fn pre_n(&self) -> usize {
        self.pre_n
    }

    /// Return the post-window size.
    #[must_use]
    pub fn post_n(&self) -> usize {
        self.post_n
    }

    /// Return the windowing mode.
    #[must_use]
    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    /// Check both window sizes against the bounds of the configured mode.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DeltaError::WindowOutOfBounds`] | `pre_n` or `post_n` is outside its mode's range |
    pub fn check_bounds(self) -> Result<Self, DeltaError> {
        for (window, size, bounds) in [
            ("pre", self.pre_n, self.mode.pre_bounds()),
            ("post", self.post_n, self.mode.post_bounds()),
        ] {
            if !bounds.contains(size) {
                return Err(DeltaError::WindowOutOfBounds {
                    window,
                    size,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(self)
    }

    /// Compute the delta of `series` around `pivot` with this configuration.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DeltaError::PivotNotFound`] | `pivot` is not on the series axis |
    pub fn compute<'a>(
        &self,
        series: &'a DailySeries,
        pivot: NaiveDate,
    ) -> Result<DeltaResult<'a>, DeltaError> {
        compute_delta(
            series,
            pivot,
            self.pre_n,
            self.post_n,
            self.mode.includes_day_before(),
        )
    }
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self::for_mode(WindowMode::PivotFirst)
    }
}
