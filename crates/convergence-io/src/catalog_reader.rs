//! CSV reader for the subject catalog.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, instrument};

use crate::dates::parse_date;
use crate::domain::{Catalog, Subject, SubjectId};
use crate::IoError;

/// Raw catalog row as it appears in the CSV.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: String,
    title: String,
    date: String,
    #[serde(default)]
    org: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    text: String,
}

/// Reads the subject catalog from a CSV file.
///
/// Expected columns: `id`, `title`, `date` (required) and `org`, `url`,
/// `text` (optional). Row order is irrelevant; subjects are keyed by ID.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed record or missing required column |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InvalidSubjectId`] | `id` is not a non-negative integer |
/// | [`IoError::InvalidDate`] | `date` cannot be parsed |
/// | [`IoError::DuplicateSubjectId`] | Same ID appears twice |
pub struct CatalogReader {
    path: PathBuf,
}

impl CatalogReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the catalog.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Catalog, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut subjects = BTreeMap::new();
        let mut first_rows: BTreeMap<SubjectId, usize> = BTreeMap::new();

        for (row_index, result) in rdr.deserialize::<CatalogRecord>().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            let id = record
                .id
                .parse::<u64>()
                .map(SubjectId::new)
                .map_err(|_| IoError::InvalidSubjectId {
                    path: self.path.clone(),
                    row_index,
                    raw: record.id.clone(),
                })?;
            let date = parse_date(&record.date).ok_or_else(|| IoError::InvalidDate {
                path: self.path.clone(),
                row_index,
                raw: record.date.clone(),
            })?;

            match first_rows.entry(id) {
                Entry::Occupied(first) => {
                    return Err(IoError::DuplicateSubjectId {
                        path: self.path.clone(),
                        subject_id: id.value(),
                        first_row: *first.get(),
                        second_row: row_index,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(row_index);
                }
            }

            subjects.insert(
                id,
                Subject {
                    id,
                    title: record.title,
                    org: record.org,
                    date,
                    url: record.url,
                    text: record.text,
                },
            );
        }

        if subjects.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_subjects = subjects.len(), "catalog loaded");
        Ok(Catalog::new(subjects))
    }
}
