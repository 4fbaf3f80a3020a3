//! I/O error types for convergence-io.

use std::path::PathBuf;

/// Errors from file I/O, CSV parsing, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a directory cannot be listed.
    #[error("cannot read directory {path}")]
    ReadDir {
        /// Directory that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a required column is absent from the header.
    #[error("missing column \"{column}\" in {path}")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// Name of the required column.
        column: &'static str,
    },

    /// Returned when a date cell cannot be parsed.
    #[error("invalid date in {path}: row {row_index}, raw value \"{raw}\"")]
    InvalidDate {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw cell value.
        raw: String,
    },

    /// Returned when a similarity score is unparseable, NaN, or infinite.
    #[error("invalid similarity score in {path}: row {row_index}, raw value \"{raw}\"")]
    InvalidScore {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw cell value.
        raw: String,
    },

    /// Returned when the same event ID appears more than once in an event log.
    #[error("duplicate event ID \"{event_id}\" in {path}: first at row {first_row}, again at row {second_row}")]
    DuplicateEventId {
        /// Path to the CSV file.
        path: PathBuf,
        /// The duplicated event ID.
        event_id: String,
        /// Zero-based row index of the first occurrence.
        first_row: usize,
        /// Zero-based row index of the second occurrence.
        second_row: usize,
    },

    /// Returned when a catalog subject ID is not a non-negative integer.
    #[error("invalid subject ID in {path}: row {row_index}, raw value \"{raw}\"")]
    InvalidSubjectId {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw cell value.
        raw: String,
    },

    /// Returned when the same subject ID appears twice in the catalog.
    #[error("duplicate subject ID {subject_id} in {path}: first at row {first_row}, again at row {second_row}")]
    DuplicateSubjectId {
        /// Path to the CSV file.
        path: PathBuf,
        /// The duplicated subject ID.
        subject_id: u64,
        /// Zero-based row index of the first occurrence.
        first_row: usize,
        /// Zero-based row index of the second occurrence.
        second_row: usize,
    },

    /// Returned when two event-log files in a data directory map to the same subject.
    #[error("subject {subject_id} has two event logs: {first} and {second}")]
    DuplicateSubjectFile {
        /// The subject ID both files map to.
        subject_id: u64,
        /// The file found first.
        first: PathBuf,
        /// The file found second.
        second: PathBuf,
    },

    /// Returned when an event log's subject has no row in the catalog.
    #[error("subject {subject_id} has an event log ({path}) but no catalog entry")]
    MissingCatalogEntry {
        /// The subject ID parsed from the file name.
        subject_id: u64,
        /// The event log.
        path: PathBuf,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result artifact cannot be serialized.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Destination path of the artifact.
        path: PathBuf,
        /// Underlying serialization error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
