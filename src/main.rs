use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use convergence_delta::{compare, DeltaConfig, WindowMode};
use convergence_io::{
    discover_event_logs, load_subjects, Catalog, CatalogReader, EventLogReader, ExperimentName,
    Precision, ResultWriter, Subject, SubjectId,
};
use convergence_series::SeriesConfig;

const MIN_THRESHOLD: f64 = 0.5;
const MAX_THRESHOLD: f64 = 0.85;
const LEAD_SENTENCES: usize = 2;

#[derive(Parser)]
#[command(name = "convergence")]
#[command(about = "Messaging convergence around press releases: pre/post mention deltas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Series construction parameters.
#[derive(Args, Debug, Clone)]
struct SeriesArgs {
    /// Similarity threshold; only events scoring strictly above it count
    #[arg(long, default_value_t = SeriesConfig::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Divide daily counts by total daily event volume
    #[arg(long, default_value_t = false)]
    baseline: bool,
}

/// Window parameters shared by `delta` and `compare`.
#[derive(Args, Debug, Clone)]
struct WindowArgs {
    /// Count the day before the release date in the post window
    #[arg(long, default_value_t = false)]
    include_day_before: bool,

    /// Pre window length in days (mode default: 7, or 6 with --include-day-before)
    #[arg(long)]
    pre_n: Option<usize>,

    /// Post window length in days (default: 3)
    #[arg(long)]
    post_n: Option<usize>,
}

/// Where subject metadata and event logs live.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Directory holding one `<prefix>_<id>.csv` event log per subject
    #[arg(long)]
    data_dir: PathBuf,

    /// Path to the subject catalog CSV (defaults to <data-dir>/press_releases.csv)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Optional JSON artifact output.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Experiment name for output files (must match [a-zA-Z0-9_-]+); no file is written without it
    #[arg(long)]
    experiment: Option<String>,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Build and print the daily series for one event log
    Series {
        /// Path to the event log CSV
        #[arg(long)]
        events: PathBuf,

        #[command(flatten)]
        series: SeriesArgs,
    },

    /// Compute the pre/post delta for one subject
    Delta {
        #[command(flatten)]
        source: SourceArgs,

        /// Subject ID
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        subject: Option<u64>,

        /// Subject title (exact match)
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compute the delta for every subject and rank them
    Compare {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct SeriesOutput {
    n_events: usize,
    n_days: usize,
    n_missing_days: usize,
    series: Vec<PointOutput>,
}

#[derive(Serialize)]
struct PointOutput {
    date: NaiveDate,
    value: String,
}

#[derive(Serialize)]
struct DeltaOutput {
    subject_id: u64,
    title: String,
    org: String,
    date: NaiveDate,
    lead: String,
    delta: String,
    avg_before: String,
    avg_after: String,
    pre_days: usize,
    post_days: usize,
}

#[derive(Serialize)]
struct CompareOutput {
    n_subjects: usize,
    n_failed: usize,
    failed: Vec<FailedOutput>,
    ranked: Vec<RankedOutput>,
}

#[derive(Serialize)]
struct FailedOutput {
    subject_id: u64,
    error: String,
}

#[derive(Serialize)]
struct RankedOutput {
    rank: usize,
    subject_id: u64,
    title: String,
    delta: String,
}

impl SeriesArgs {
    fn config(&self) -> Result<SeriesConfig> {
        anyhow::ensure!(
            (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.threshold),
            "threshold {} is outside {MIN_THRESHOLD}..={MAX_THRESHOLD}",
            self.threshold
        );
        Ok(SeriesConfig::new(self.threshold)?.with_baseline_correction(self.baseline))
    }
}

impl WindowArgs {
    fn config(&self) -> Result<DeltaConfig> {
        let mode = WindowMode::from_include_day_before(self.include_day_before);
        let mut config = DeltaConfig::for_mode(mode);
        if let Some(pre_n) = self.pre_n {
            config = config.with_pre_n(pre_n);
        }
        if let Some(post_n) = self.post_n {
            config = config.with_post_n(post_n);
        }
        Ok(config.check_bounds()?)
    }
}

impl SourceArgs {
    fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| self.data_dir.join("press_releases.csv"))
    }
}

impl OutputArgs {
    fn writer(&self) -> Result<Option<ResultWriter>> {
        let Some(name) = &self.experiment else {
            return Ok(None);
        };
        let experiment = ExperimentName::new(name.clone())?;
        Ok(Some(ResultWriter::new(&self.output_dir, experiment)?))
    }
}

fn resolve_subject<'a>(
    catalog: &'a Catalog,
    id: Option<u64>,
    title: Option<&str>,
) -> Result<&'a Subject> {
    match (id, title) {
        (Some(id), _) => catalog
            .get(SubjectId::new(id))
            .with_context(|| format!("subject {id} is not in the catalog")),
        (None, Some(title)) => catalog
            .find_by_title(title)
            .with_context(|| format!("no subject titled \"{title}\"")),
        (None, None) => anyhow::bail!("either --subject or --title is required"),
    }
}

fn event_log_path(data_dir: &Path, catalog: &Path, id: SubjectId) -> Result<PathBuf> {
    discover_event_logs(data_dir, catalog)?
        .into_iter()
        .find_map(|(found, path)| (found == id).then_some(path))
        .with_context(|| format!("no event log for subject {id} in {}", data_dir.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Series { events, series } => {
            let config = series.config()?;
            let log = EventLogReader::new(&events)
                .read()
                .context("failed to read event log")?;
            let built = config.build(&log).context("failed to build series")?;
            let precision = Precision::for_baseline(config.baseline_correct());

            let output = SeriesOutput {
                n_events: log.len(),
                n_days: built.len(),
                n_missing_days: built.gaps().len(),
                series: built
                    .iter()
                    .map(|(date, value)| PointOutput {
                        date,
                        value: precision.format(value),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Delta {
            source,
            subject,
            title,
            series,
            window,
            output,
        } => {
            let series_config = series.config()?;
            let delta_config = window.config()?;
            let catalog_path = source.catalog_path();

            // 1. Resolve the subject
            let catalog = CatalogReader::new(&catalog_path)
                .read()
                .context("failed to read catalog")?;
            let subject = resolve_subject(&catalog, subject, title.as_deref())?;
            info!(subject = %subject.id, title = %subject.title, "subject selected");

            // 2. Load its event log and build the series
            let path = event_log_path(&source.data_dir, &catalog_path, subject.id)?;
            let events = EventLogReader::new(&path)
                .read()
                .context("failed to read event log")?;
            let built = series_config
                .build(&events)
                .context("failed to build series")?;

            // 3. Delta around the release date
            let result = delta_config
                .compute(&built, subject.date)
                .context("release date is not in the subject's event log")?;
            info!(
                delta = result.delta,
                pre_days = result.pre.len(),
                post_days = result.post.len(),
                "delta computed"
            );
            if result.pre.len() < delta_config.pre_n() || result.post.len() < delta_config.post_n() {
                warn!("window truncated at the edge of the event log");
            }

            // 4. Artifact and summary
            if let Some(writer) = output.writer()? {
                writer.write_delta(subject, &series_config, &delta_config, &built, &result)?;
            }

            let precision = Precision::for_baseline(series_config.baseline_correct());
            let summary = DeltaOutput {
                subject_id: subject.id.value(),
                title: subject.title.clone(),
                org: subject.org.clone(),
                date: subject.date,
                lead: subject.lead(LEAD_SENTENCES).to_string(),
                delta: precision.format(result.delta),
                avg_before: precision.format(result.pre_mean()),
                avg_after: precision.format(result.post_mean()),
                pre_days: result.pre.len(),
                post_days: result.post.len(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Compare {
            source,
            series,
            window,
            output,
        } => {
            let series_config = series.config()?;
            let delta_config = window.config()?;
            let catalog_path = source.catalog_path();

            // 1. Catalog and event logs
            let catalog = CatalogReader::new(&catalog_path)
                .read()
                .context("failed to read catalog")?;
            let logs = discover_event_logs(&source.data_dir, &catalog_path)?;
            let loaded = load_subjects(&catalog, &logs);

            // 2. Rank
            let comparison = compare(loaded.inputs, &series_config, &delta_config);

            // 3. Artifact and summary
            if let Some(writer) = output.writer()? {
                writer.write_comparison(
                    &catalog,
                    &series_config,
                    &delta_config,
                    &comparison,
                    &loaded.failures,
                )?;
            }

            let mut failed: Vec<FailedOutput> = loaded
                .failures
                .iter()
                .map(|f| FailedOutput {
                    subject_id: f.subject_id.value(),
                    error: f.error.to_string(),
                })
                .chain(comparison.failures.iter().map(|f| FailedOutput {
                    subject_id: f.key.value(),
                    error: f.error.to_string(),
                }))
                .collect();
            failed.sort_by_key(|f| f.subject_id);

            let precision = Precision::for_baseline(series_config.baseline_correct());
            let summary = CompareOutput {
                n_subjects: comparison.n_subjects() + loaded.failures.len(),
                n_failed: failed.len(),
                failed,
                ranked: comparison
                    .ranked
                    .iter()
                    .enumerate()
                    .map(|(i, row)| RankedOutput {
                        rank: i + 1,
                        subject_id: row.key.value(),
                        title: catalog
                            .get(row.key)
                            .map(|s| s.title.clone())
                            .unwrap_or_default(),
                        delta: precision.format(row.delta),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
