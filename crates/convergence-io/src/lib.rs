//! File I/O, validation, and serialization for the convergence pipeline.

mod batch;
mod catalog_reader;
mod dates;
mod discover;
mod display;
mod domain;
mod error;
mod event_reader;
mod writer;

pub use batch::{load_subjects, LoadFailure, LoadedSubjects};
pub use catalog_reader::CatalogReader;
pub use dates::parse_date;
pub use discover::discover_event_logs;
pub use display::{format_value, Precision};
pub use domain::{Catalog, ExperimentName, Subject, SubjectId};
pub use error::IoError;
pub use event_reader::EventLogReader;
pub use writer::ResultWriter;
