//! Discovery of per-subject event-log files in a data directory.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::domain::SubjectId;
use crate::IoError;

/// Find every event log in `dir`, keyed by the subject ID in its file name.
///
/// Event logs are `*.csv` files named `<prefix>_<id>.csv` (e.g. `pr_137.csv`).
/// The catalog file is skipped even if it lives in the same directory, and so
/// is any CSV whose name does not end in `_<integer>`. Results are sorted by ID.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::ReadDir`] | `dir` cannot be listed |
/// | [`IoError::DuplicateSubjectFile`] | Two files carry the same subject ID |
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn discover_event_logs(
    dir: &Path,
    catalog: &Path,
) -> Result<Vec<(SubjectId, PathBuf)>, IoError> {
    let read_dir_error = |e| IoError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    };
    let catalog_name = catalog.file_name();

    let mut found: BTreeMap<SubjectId, PathBuf> = BTreeMap::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "csv") {
            continue;
        }
        if path.file_name() == catalog_name {
            continue;
        }
        let Some(id) = subject_id_from_path(&path) else {
            debug!(path = %path.display(), "skipping file without a subject ID");
            continue;
        };
        match found.entry(id) {
            Entry::Occupied(first) => {
                return Err(IoError::DuplicateSubjectFile {
                    subject_id: id.value(),
                    first: first.get().clone(),
                    second: path,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
        }
    }

    info!(n_logs = found.len(), "event logs discovered");
    Ok(found.into_iter().collect())
}

fn subject_id_from_path(path: &Path) -> Option<SubjectId> {
    let stem = path.file_stem()?.to_str()?;
    let (_, id) = stem.rsplit_once('_')?;
    id.parse().ok().map(SubjectId::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn id_from_file_name() {
        assert_eq!(
            subject_id_from_path(Path::new("data/pr_137.csv")),
            Some(SubjectId::new(137))
        );
        assert_eq!(
            subject_id_from_path(Path::new("tweets_by_pr_9.csv")),
            Some(SubjectId::new(9))
        );
        assert_eq!(subject_id_from_path(Path::new("press_releases.csv")), None);
        assert_eq!(subject_id_from_path(Path::new("noid.csv")), None);
    }

    #[test]
    fn discovers_sorted_and_skips_catalog() {
        let dir = TempDir::new().unwrap();
        for name in ["pr_20.csv", "pr_3.csv", "press_releases.csv", "notes.txt", "pr_x.csv"] {
            fs::write(dir.path().join(name), "date\n").unwrap();
        }
        let catalog = dir.path().join("press_releases.csv");
        let logs = discover_event_logs(dir.path(), &catalog).unwrap();
        let ids: Vec<u64> = logs.iter().map(|(id, _)| id.value()).collect();
        assert_eq!(ids, vec![3, 20]);
        assert!(logs[0].1.ends_with("pr_3.csv"));
    }

    #[test]
    fn catalog_with_numeric_suffix_is_still_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("catalog_2021.csv"), "id\n").unwrap();
        fs::write(dir.path().join("pr_1.csv"), "date\n").unwrap();
        let logs = discover_event_logs(dir.path(), &dir.path().join("catalog_2021.csv")).unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn duplicate_subject_files_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pr_1.csv"), "date\n").unwrap();
        fs::write(dir.path().join("tw_1.csv"), "date\n").unwrap();
        let result = discover_event_logs(dir.path(), Path::new("press_releases.csv"));
        assert!(matches!(
            result,
            Err(IoError::DuplicateSubjectFile { subject_id: 1, .. })
        ));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = discover_event_logs(Path::new("/nonexistent/dir"), Path::new("c.csv"));
        assert!(matches!(result, Err(IoError::ReadDir { .. })));
    }
}
