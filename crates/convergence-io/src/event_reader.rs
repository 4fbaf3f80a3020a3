//! CSV event-log reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use convergence_series::Event;
use tracing::{debug, info, instrument};

use crate::dates::parse_date;
use crate::IoError;

const DATE_COLUMN: &str = "date";
const SCORE_COLUMNS: [&str; 2] = ["sim", "similarity"];
const ID_COLUMNS: [&str; 2] = ["tweet_id", "event_id"];

/// Reads one subject's event log from a CSV file.
///
/// Expected CSV format:
/// - Header row required; columns are located by name, in any order
/// - `date` (required): `YYYY-MM-DD`, optionally followed by a time of day
/// - `sim` or `similarity` (optional): similarity score; an empty cell means
///   the event has no score
/// - `tweet_id` or `event_id` (optional): must be unique when present
/// - Other columns are ignored
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | No `date` column in the header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InvalidDate`] | Date cell cannot be parsed |
/// | [`IoError::InvalidScore`] | Score cell is NaN, Inf, or unparseable |
/// | [`IoError::DuplicateEventId`] | Same event ID appears twice |
pub struct EventLogReader {
    path: PathBuf,
}

impl EventLogReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning the events in file order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Event>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let find = |names: &[&str]| header.iter().position(|h| names.contains(&h));
        let date_col = find(&[DATE_COLUMN]).ok_or(IoError::MissingColumn {
            path: self.path.clone(),
            column: DATE_COLUMN,
        })?;
        let score_col = find(&SCORE_COLUMNS);
        let id_col = find(&ID_COLUMNS);
        debug!(date_col, ?score_col, ?id_col, "read CSV header");

        let mut events = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if let Some(col) = id_col {
                let event_id = record.get(col).unwrap_or("").to_string();
                if !event_id.is_empty() {
                    if let Some(&first_row) = seen.get(&event_id) {
                        return Err(IoError::DuplicateEventId {
                            path: self.path.clone(),
                            event_id,
                            first_row,
                            second_row: row_index,
                        });
                    }
                    seen.insert(event_id, row_index);
                }
            }

            let raw_date = record.get(date_col).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| IoError::InvalidDate {
                path: self.path.clone(),
                row_index,
                raw: raw_date.to_string(),
            })?;

            let raw_score = score_col.and_then(|col| record.get(col)).unwrap_or("");
            let event = if raw_score.is_empty() {
                Event::unscored(date)
            } else {
                let score: f64 = raw_score
                    .parse()
                    .ok()
                    .filter(|s: &f64| s.is_finite())
                    .ok_or_else(|| IoError::InvalidScore {
                        path: self.path.clone(),
                        row_index,
                        raw: raw_score.to_string(),
                    })?;
                Event::new(date, score)
            };
            events.push(event);
        }

        if events.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_events = events.len(),
            n_unscored = events.iter().filter(|e| e.similarity().is_none()).count(),
            "event log loaded"
        );
        Ok(events)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, d).unwrap()
    }

    #[test]
    fn read_scored_log() {
        let csv = "tweet_id,date,sim\n1,2021-05-01,0.8\n2,2021-05-01,0.3\n3,2021-05-02,0.9\n";
        let f = write_csv(csv);
        let events = EventLogReader::new(f.path()).read().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], Event::new(day(1), 0.8));
        assert_eq!(events[2].date(), day(2));
    }

    #[test]
    fn columns_located_by_name() {
        let csv = "similarity,text,date\n0.5,hello,2021-05-03 10:00:00\n";
        let f = write_csv(csv);
        let events = EventLogReader::new(f.path()).read().unwrap();
        assert_eq!(events, vec![Event::new(day(3), 0.5)]);
    }

    #[test]
    fn empty_score_is_unscored() {
        let csv = "date,sim\n2021-05-01,\n2021-05-02,0.7\n";
        let f = write_csv(csv);
        let events = EventLogReader::new(f.path()).read().unwrap();
        assert_eq!(events[0], Event::unscored(day(1)));
        assert_eq!(events[1].similarity(), Some(0.7));
    }

    #[test]
    fn missing_score_column_gives_unscored_events() {
        let csv = "date\n2021-05-01\n";
        let f = write_csv(csv);
        let events = EventLogReader::new(f.path()).read().unwrap();
        assert_eq!(events, vec![Event::unscored(day(1))]);
    }

    #[test]
    fn error_file_not_found() {
        let result = EventLogReader::new(Path::new("/nonexistent/pr_1.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_missing_date_column() {
        let f = write_csv("tweet_id,sim\n1,0.5\n");
        let result = EventLogReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::MissingColumn { column: "date", .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("date,sim\n");
        let result = EventLogReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_invalid_date() {
        let f = write_csv("date,sim\n2021-05-01,0.1\nyesterday,0.2\n");
        let result = EventLogReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidDate { row_index: 1, .. })));
    }

    #[test]
    fn error_non_finite_score() {
        let f = write_csv("date,sim\n2021-05-01,NaN\n");
        let result = EventLogReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidScore { .. })));

        let f = write_csv("date,sim\n2021-05-01,high\n");
        let result = EventLogReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidScore { .. })));
    }

    #[test]
    fn error_duplicate_event_id() {
        let csv = "tweet_id,date,sim\n10,2021-05-01,0.1\n11,2021-05-01,0.2\n10,2021-05-02,0.3\n";
        let f = write_csv(csv);
        let result = EventLogReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::DuplicateEventId {
                first_row: 0,
                second_row: 2,
                ..
            })
        ));
    }
}
