//! Loading discovered event logs into batch comparison inputs.

use std::path::{Path, PathBuf};

use convergence_delta::SubjectInput;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::domain::{Catalog, SubjectId};
use crate::event_reader::EventLogReader;
use crate::IoError;

/// A subject whose event log could not be turned into a comparison input.
#[derive(Debug)]
pub struct LoadFailure {
    /// The subject the log belongs to.
    pub subject_id: SubjectId,
    /// Why loading failed.
    pub error: IoError,
}

/// Comparison inputs plus the subjects that could not be loaded.
#[derive(Debug)]
pub struct LoadedSubjects {
    /// One input per readable log with a catalog entry, in `logs` order.
    pub inputs: Vec<SubjectInput<SubjectId>>,
    /// Subjects skipped at load time, in `logs` order.
    pub failures: Vec<LoadFailure>,
}

/// Read every event log and pair it with its catalog release date.
///
/// Logs are read in parallel. A log that cannot be read, or whose subject is
/// missing from `catalog`, becomes a [`LoadFailure`] instead of aborting the
/// batch.
#[instrument(skip_all, fields(n_logs = logs.len()))]
pub fn load_subjects(catalog: &Catalog, logs: &[(SubjectId, PathBuf)]) -> LoadedSubjects {
    let outcomes: Vec<Result<SubjectInput<SubjectId>, LoadFailure>> = logs
        .par_iter()
        .map(|(subject_id, path)| {
            load_one(catalog, *subject_id, path).map_err(|error| LoadFailure {
                subject_id: *subject_id,
                error,
            })
        })
        .collect();

    let mut inputs = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(input) => inputs.push(input),
            Err(failure) => {
                warn!(subject = %failure.subject_id, error = %failure.error, "event log skipped");
                failures.push(failure);
            }
        }
    }

    info!(
        n_loaded = inputs.len(),
        n_failed = failures.len(),
        "event logs loaded"
    );
    LoadedSubjects { inputs, failures }
}

fn load_one(
    catalog: &Catalog,
    subject_id: SubjectId,
    path: &Path,
) -> Result<SubjectInput<SubjectId>, IoError> {
    let subject = catalog
        .get(subject_id)
        .ok_or_else(|| IoError::MissingCatalogEntry {
            subject_id: subject_id.value(),
            path: path.to_path_buf(),
        })?;
    let events = EventLogReader::new(path).read()?;
    Ok(SubjectInput {
        key: subject_id,
        events,
        pivot: subject.date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogReader;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        let catalog_path = dir.path().join("press_releases.csv");
        fs::write(
            &catalog_path,
            "id,title,date\n1,Good,2021-03-02\n2,Empty,2021-03-02\n",
        )
        .unwrap();
        let catalog = CatalogReader::new(&catalog_path).read().unwrap();
        (dir, catalog)
    }

    #[test]
    fn readable_logs_become_inputs() {
        let (dir, catalog) = setup();
        let path = dir.path().join("pr_1.csv");
        fs::write(&path, "date,sim\n2021-03-01,0.9\n2021-03-02,0.8\n").unwrap();

        let loaded = load_subjects(&catalog, &[(SubjectId::new(1), path)]);
        assert!(loaded.failures.is_empty());
        assert_eq!(loaded.inputs.len(), 1);
        assert_eq!(loaded.inputs[0].key, SubjectId::new(1));
        assert_eq!(loaded.inputs[0].events.len(), 2);
        assert_eq!(loaded.inputs[0].pivot, catalog.get(SubjectId::new(1)).unwrap().date);
    }

    #[test]
    fn bad_logs_are_failures_not_errors() {
        let (dir, catalog) = setup();
        let good = dir.path().join("pr_1.csv");
        let empty = dir.path().join("pr_2.csv");
        let orphan = dir.path().join("pr_5.csv");
        fs::write(&good, "date,sim\n2021-03-02,0.9\n").unwrap();
        fs::write(&empty, "date,sim\n").unwrap();
        fs::write(&orphan, "date,sim\n2021-03-02,0.9\n").unwrap();

        let logs = vec![
            (SubjectId::new(1), good),
            (SubjectId::new(2), empty),
            (SubjectId::new(5), orphan),
        ];
        let loaded = load_subjects(&catalog, &logs);
        assert_eq!(loaded.inputs.len(), 1);
        assert_eq!(loaded.failures.len(), 2);
        assert_eq!(loaded.failures[0].subject_id, SubjectId::new(2));
        assert!(matches!(loaded.failures[0].error, IoError::EmptyDataset { .. }));
        assert_eq!(loaded.failures[1].subject_id, SubjectId::new(5));
        assert!(matches!(
            loaded.failures[1].error,
            IoError::MissingCatalogEntry { subject_id: 5, .. }
        ));
    }
}
