use chrono::NaiveDate;

/// One observed mention, dated to the calendar day.
///
/// `similarity` is the score against the subject's messaging. An event without
/// a score never passes a threshold filter but still belongs to the unfiltered
/// population: it anchors the date axis but is left out of the daily scored
/// total that baseline correction divides by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    date: NaiveDate,
    similarity: Option<f64>,
}

impl Event {
    /// Create a scored event.
    #[must_use]
    pub fn new(date: NaiveDate, similarity: f64) -> Self {
        Self {
            date,
            similarity: Some(similarity),
        }
    }

    /// Create an event with no similarity score.
    #[must_use]
    pub fn unscored(date: NaiveDate) -> Self {
        Self {
            date,
            similarity: None,
        }
    }

    /// Return the event date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Return the similarity score, if any.
    #[must_use]
    pub fn similarity(&self) -> Option<f64> {
        self.similarity
    }

    /// Return true if the score is strictly above `threshold`.
    #[must_use]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.similarity.is_some_and(|s| s > threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    #[test]
    fn exceeds_is_strict() {
        let e = Event::new(day(1), 0.725);
        assert!(!e.exceeds(0.725));
        assert!(e.exceeds(0.72));
    }

    #[test]
    fn unscored_never_exceeds() {
        let e = Event::unscored(day(1));
        assert!(!e.exceeds(f64::NEG_INFINITY));
        assert_eq!(e.similarity(), None);
    }
}
