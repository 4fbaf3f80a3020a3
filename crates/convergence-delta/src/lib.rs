//! Pre/post window delta computation around a pivot date.
//!
//! Extracts the pre and post windows of a daily series relative to a pivot
//! date, computes `mean(post) - mean(pre)`, and ranks deltas across many
//! subjects in parallel.

mod compare;
mod config;
mod engine;
mod error;
mod mode;

pub use compare::{compare, Comparison, SubjectDelta, SubjectFailure, SubjectInput};
pub use config::DeltaConfig;
pub use engine::{compute_delta, DeltaResult};
pub use error::DeltaError;
pub use mode::{WindowBounds, WindowMode};
