//! Domain types for convergence-io.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::IoError;

/// Identifier of a subject (a press release) in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(u64);

impl SubjectId {
    /// Create a subject ID.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Return the numeric ID.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog entry for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    /// Subject identifier; event-log files are named after it.
    pub id: SubjectId,
    /// Headline of the press release.
    pub title: String,
    /// Issuing organisation.
    pub org: String,
    /// Release date, used as the pivot date.
    pub date: NaiveDate,
    /// Source URL.
    pub url: String,
    /// Body text.
    pub text: String,
}

impl Subject {
    /// Return the first `n_sentences` sentences of the body text.
    ///
    /// Sentences end at `.`, `!` or `?` followed by whitespace or end of text.
    #[must_use]
    pub fn lead(&self, n_sentences: usize) -> &str {
        let mut seen = 0;
        let mut chars = self.text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if matches!(c, '.' | '!' | '?')
                && chars.peek().is_none_or(|(_, next)| next.is_whitespace())
            {
                seen += 1;
                if seen == n_sentences {
                    return &self.text[..i + c.len_utf8()];
                }
            }
        }
        &self.text
    }
}

/// The subject catalog, keyed by ID.
#[derive(Debug, Default)]
pub struct Catalog {
    subjects: BTreeMap<SubjectId, Subject>,
}

impl Catalog {
    /// Create a catalog from subjects whose IDs are already known to be unique.
    pub(crate) fn new(subjects: BTreeMap<SubjectId, Subject>) -> Self {
        Self { subjects }
    }

    /// Look up a subject by ID.
    #[must_use]
    pub fn get(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    /// Look up a subject by exact title. The lowest ID wins if titles repeat.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&Subject> {
        self.subjects.values().find(|s| s.title == title)
    }

    /// Iterate over subjects in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    /// Return the number of subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Return true if the catalog has no subjects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: u64, title: &str, text: &str) -> Subject {
        Subject {
            id: SubjectId::new(id),
            title: title.to_string(),
            org: "Org".to_string(),
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            url: String::new(),
            text: text.to_string(),
        }
    }

    #[test]
    fn lead_takes_first_sentences() {
        let s = subject(1, "t", "First one. Second one! Third? Fourth.");
        assert_eq!(s.lead(1), "First one.");
        assert_eq!(s.lead(2), "First one. Second one!");
        assert_eq!(s.lead(10), "First one. Second one! Third? Fourth.");
    }

    #[test]
    fn lead_ignores_inner_periods() {
        let s = subject(1, "t", "Version 2.5 ships today. More soon.");
        assert_eq!(s.lead(1), "Version 2.5 ships today.");
    }

    #[test]
    fn catalog_lookup() {
        let subjects = [subject(137, "Alpha", ""), subject(42, "Beta", "")]
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let catalog = Catalog::new(subjects);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(SubjectId::new(137)).unwrap().title, "Alpha");
        assert_eq!(catalog.find_by_title("Beta").unwrap().id.value(), 42);
        assert!(catalog.find_by_title("Gamma").is_none());
        let ids: Vec<u64> = catalog.iter().map(|s| s.id.value()).collect();
        assert_eq!(ids, vec![42, 137]);
    }

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("run-2021_q1".to_string()).unwrap();
        assert_eq!(name.as_str(), "run-2021_q1");
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("my run!".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
        assert!(ExperimentName::new(String::new()).is_err());
    }
}
