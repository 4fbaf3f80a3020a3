//! Display rounding for deltas and window means.

/// Decimal places used when showing values of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Raw daily counts: whole numbers.
    Count,
    /// Baseline-corrected proportions.
    Proportion,
}

impl Precision {
    /// Pick the precision matching the baseline-correction setting.
    #[must_use]
    pub fn for_baseline(baseline_correct: bool) -> Self {
        if baseline_correct {
            Self::Proportion
        } else {
            Self::Count
        }
    }

    /// Return the number of decimal places.
    #[must_use]
    pub fn decimals(self) -> usize {
        match self {
            Self::Count => 0,
            Self::Proportion => 5,
        }
    }

    /// Format `value` with this precision. See [`format_value`].
    #[must_use]
    pub fn format(self, value: f64) -> String {
        format_value(value, self.decimals())
    }
}

/// Round `value` to `decimals` places for display, or `"N/A"` if it is not finite.
#[must_use]
pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        let rounded = format!("{value:.decimals$}");
        // "-0" and "-0.00" read as a sign where there is none
        if rounded.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
            rounded.trim_start_matches('-').to_string()
        } else {
            rounded
        }
    } else {
        "N/A".to_string()
    }
}
