//! Windowing modes and their window-size bounds.

use std::fmt;

/// Where the day before the pivot date belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowMode {
    /// The pivot date opens the post window; the day before closes the pre window.
    #[default]
    PivotFirst,
    /// The day before the pivot opens the post window (e.g. evening-before
    /// embargo leaks); the pre window ends two days before the pivot.
    DayBeforeInPost,
}

impl WindowMode {
    /// Map the `include_day_before_in_post` flag to a mode.
    #[must_use]
    pub fn from_include_day_before(include_day_before_in_post: bool) -> Self {
        if include_day_before_in_post {
            Self::DayBeforeInPost
        } else {
            Self::PivotFirst
        }
    }

    /// Return true for [`WindowMode::DayBeforeInPost`].
    #[must_use]
    pub fn includes_day_before(self) -> bool {
        matches!(self, Self::DayBeforeInPost)
    }

    /// Offset of the post window start relative to the pivot index.
    pub(crate) fn post_offset(self) -> usize {
        match self {
            Self::PivotFirst => 0,
            Self::DayBeforeInPost => 1,
        }
    }

    /// Accepted pre-window sizes for this mode.
    #[must_use]
    pub fn pre_bounds(self) -> WindowBounds {
        match self {
            Self::PivotFirst => WindowBounds::new(1, 7, 7),
            Self::DayBeforeInPost => WindowBounds::new(1, 6, 6),
        }
    }

    /// Accepted post-window sizes for this mode.
    ///
    /// With the day before in the post window, a single-day post window would
    /// exclude the pivot date itself, so the minimum is 2.
    #[must_use]
    pub fn post_bounds(self) -> WindowBounds {
        match self {
            Self::PivotFirst => WindowBounds::new(1, 7, 3),
            Self::DayBeforeInPost => WindowBounds::new(2, 9, 3),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PivotFirst => f.write_str("pivot-first"),
            Self::DayBeforeInPost => f.write_str("day-before-in-post"),
        }
    }
}

/// Inclusive window-size range with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    /// Smallest accepted size.
    pub min: usize,
    /// Largest accepted size.
    pub max: usize,
    /// Size used when none is given.
    pub default: usize,
}

impl WindowBounds {
    const fn new(min: usize, max: usize, default: usize) -> Self {
        Self { min, max, default }
    }

    /// Return true if `size` lies within `min..=max`.
    #[must_use]
    pub fn contains(&self, size: usize) -> bool {
        (self.min..=self.max).contains(&size)
    }
}
