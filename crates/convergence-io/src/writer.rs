//! JSON result writer for delta and comparison outputs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use convergence_delta::{Comparison, DeltaConfig, DeltaResult};
use convergence_series::{DailySeries, SeriesConfig};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::batch::LoadFailure;
use crate::domain::{Catalog, ExperimentName, Subject, SubjectId};
use crate::IoError;

/// Writes delta and comparison results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_delta.json` and
/// `{experiment}_compare.json`. Non-finite numbers are written as `null`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the single-subject delta artifact.
    #[must_use]
    pub fn delta_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_delta.json", self.experiment.as_str()))
    }

    /// Path of the batch comparison artifact.
    #[must_use]
    pub fn compare_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_compare.json", self.experiment.as_str()))
    }

    /// Write one subject's series and delta to `{experiment}_delta.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all, fields(subject = %subject.id))]
    pub fn write_delta(
        &self,
        subject: &Subject,
        series_config: &SeriesConfig,
        delta_config: &DeltaConfig,
        series: &DailySeries,
        result: &DeltaResult<'_>,
    ) -> Result<(), IoError> {
        let path = self.delta_path();

        let artifact = DeltaArtifact {
            experiment: self.experiment.as_str(),
            subject_id: subject.id.value(),
            title: &subject.title,
            org: &subject.org,
            pivot: result.pivot,
            parameters: Parameters::new(series_config, delta_config),
            delta: finite(result.delta),
            pre_mean: finite(result.pre_mean()),
            post_mean: finite(result.post_mean()),
            pre: points(result.pre.iter()),
            post: points(result.post.iter()),
            series: points(series.iter()),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "delta result written");
        Ok(())
    }

    /// Write a ranked batch comparison to `{experiment}_compare.json`.
    ///
    /// Subjects missing from `catalog` are written with empty metadata.
    /// `load_failures` are listed with the comparison's own failures, sorted by
    /// subject ID, and count toward `n_subjects`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all, fields(n_ranked = comparison.ranked.len(), n_load_failures = load_failures.len()))]
    pub fn write_comparison(
        &self,
        catalog: &Catalog,
        series_config: &SeriesConfig,
        delta_config: &DeltaConfig,
        comparison: &Comparison<SubjectId>,
        load_failures: &[LoadFailure],
    ) -> Result<(), IoError> {
        let path = self.compare_path();

        let ranked: Vec<RankedEntry<'_>> = comparison
            .ranked
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let subject = catalog.get(row.key);
                RankedEntry {
                    rank: i + 1,
                    subject_id: row.key.value(),
                    title: subject.map_or("", |s| s.title.as_str()),
                    org: subject.map_or("", |s| s.org.as_str()),
                    date: subject.map(|s| s.date),
                    url: subject.map_or("", |s| s.url.as_str()),
                    text: subject.map_or("", |s| s.text.as_str()),
                    delta: finite(row.delta),
                    pre_mean: finite(row.pre_mean),
                    post_mean: finite(row.post_mean),
                    pre_days: row.pre_len,
                    post_days: row.post_len,
                }
            })
            .collect();

        let mut failures: Vec<FailureEntry> = load_failures
            .iter()
            .map(|f| FailureEntry {
                subject_id: f.subject_id.value(),
                stage: "load",
                error: f.error.to_string(),
            })
            .chain(comparison.failures.iter().map(|f| FailureEntry {
                subject_id: f.key.value(),
                stage: "compute",
                error: f.error.to_string(),
            }))
            .collect();
        failures.sort_by_key(|f| f.subject_id);

        let artifact = CompareArtifact {
            experiment: self.experiment.as_str(),
            parameters: Parameters::new(series_config, delta_config),
            n_subjects: comparison.n_subjects() + load_failures.len(),
            ranked,
            failures,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "comparison result written");
        Ok(())
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn points(iter: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<Point> {
    iter.map(|(date, value)| Point {
        date,
        value: finite(value),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Artifact shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Parameters {
    threshold: f64,
    baseline_correct: bool,
    include_day_before_in_post: bool,
    pre_n: usize,
    post_n: usize,
}

impl Parameters {
    fn new(series_config: &SeriesConfig, delta_config: &DeltaConfig) -> Self {
        Self {
            threshold: series_config.threshold(),
            baseline_correct: series_config.baseline_correct(),
            include_day_before_in_post: delta_config.mode().includes_day_before(),
            pre_n: delta_config.pre_n(),
            post_n: delta_config.post_n(),
        }
    }
}

#[derive(Serialize)]
struct Point {
    date: NaiveDate,
    value: Option<f64>,
}

#[derive(Serialize)]
struct DeltaArtifact<'a> {
    experiment: &'a str,
    subject_id: u64,
    title: &'a str,
    org: &'a str,
    pivot: NaiveDate,
    parameters: Parameters,
    delta: Option<f64>,
    pre_mean: Option<f64>,
    post_mean: Option<f64>,
    pre: Vec<Point>,
    post: Vec<Point>,
    series: Vec<Point>,
}

#[derive(Serialize)]
struct RankedEntry<'a> {
    rank: usize,
    subject_id: u64,
    title: &'a str,
    org: &'a str,
    date: Option<NaiveDate>,
    url: &'a str,
    text: &'a str,
    delta: Option<f64>,
    pre_mean: Option<f64>,
    post_mean: Option<f64>,
    pre_days: usize,
    post_days: usize,
}

#[derive(Serialize)]
struct FailureEntry {
    subject_id: u64,
    stage: &'static str,
    error: String,
}

#[derive(Serialize)]
struct CompareArtifact<'a> {
    experiment: &'a str,
    parameters: Parameters,
    n_subjects: usize,
    ranked: Vec<RankedEntry<'a>>,
    failures: Vec<FailureEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use convergence_series::Window;

    #[test]
    fn finite_maps_nan_to_none() {
        assert_eq!(finite(1.5), Some(1.5));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::NEG_INFINITY), None);
    }

    #[test]
    fn windows_serialize_nan_as_null() {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let series = DailySeries::new(vec![day], vec![f64::NAN]).unwrap();
        let window: Window<'_> = series.as_window();
        let json = serde_json::to_string(&points(window.iter())).unwrap();
        assert_eq!(json, r#"[{"date":"2021-01-01","value":null}]"#);
    }
}
