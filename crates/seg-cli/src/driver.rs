//! Conversion driver
//!
//! Runs the whole pipeline for one annotation file:
//! 1. check the input and destination
//! 2. place the clip in calendar time from the file names
//! 3. load the graph, aggregate and format every record in memory
//! 4. build the credit header
//! 5. merge the base log (staged or in place) into the destination
//!
//! The destination is only written by the final rename of the merge, so
//! any failure leaves it as it was.

use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::naming::{clip_offset_secs, default_graph_path, recording_start_epoch_secs};
use crate::staging::locate_staged_log;
use chrono::{DateTime, Utc};
use seg_core::{
    aggregate, author_from_file, merge_log_into, CreditHeader, MergeReport, RecordFormatter,
    TimestampError,
};
use seg_graph::{GraphSource, JsonGraphSource};
use std::path::PathBuf;

/// One annotation file to merge into one log
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Source annotation file
    pub input: PathBuf,
    /// Destination `.seg` log
    pub output: PathBuf,
    /// Exported graph; derived from `input` when absent
    pub graph: Option<PathBuf>,
    /// Run settings
    pub config: DriverConfig,
}

impl ConversionJob {
    /// Create job with default settings
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            graph: None,
            config: DriverConfig::default(),
        }
    }

    /// With explicit graph path
    #[inline]
    #[must_use]
    pub fn with_graph(mut self, graph: impl Into<PathBuf>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// With settings
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Graph path used for this job
    #[must_use]
    pub fn graph_path(&self) -> PathBuf {
        self.graph
            .clone()
            .unwrap_or_else(|| default_graph_path(&self.input))
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Clip offset into the recording, in seconds
    pub clip_offset_secs: i64,
    /// Epoch seconds that annotation offsets are relative to
    pub video_start_epoch_secs: i64,
    /// Nodes in the loaded graph
    pub nodes: usize,
    /// Records left after formatting
    pub records: usize,
    /// Author written into the credit header
    pub author: String,
    /// What the merge pass did
    pub merge: MergeReport,
}

fn check_paths(job: &ConversionJob) -> Result<(), DriverError> {
    if !job.input.is_file() {
        return Err(DriverError::MissingInput(job.input.clone()));
    }
    let exists = job.output.exists();
    if job.config.use_staging {
        if exists && !job.config.overwrite {
            return Err(DriverError::OutputExists(job.output.clone()));
        }
    } else if !exists {
        return Err(DriverError::MissingBaseLog(job.output.clone()));
    }
    Ok(())
}

/// Run `job` against an already chosen graph source
///
/// `now` stamps the credit header.
///
/// # Errors
/// Any [`DriverError`]; on error the destination log is unchanged.
pub fn run(
    job: &ConversionJob,
    source: &dyn GraphSource,
    now: DateTime<Utc>,
) -> Result<ConversionSummary, DriverError> {
    check_paths(job)?;

    let clip_offset_secs = clip_offset_secs(&job.input);
    tracing::info!("Start of the clip in seconds: {}", clip_offset_secs);
    let video_start_epoch_secs = recording_start_epoch_secs(&job.output)?
        .checked_add(clip_offset_secs)
        .ok_or_else(|| TimestampError::OutOfRange(format!("clip offset {clip_offset_secs}s")))?;
    tracing::debug!("Video start epoch seconds: {}", video_start_epoch_secs);

    let graph = source.load()?;
    let conversion = &job.config.conversion;
    let records = aggregate(&graph, conversion)?;
    let formatted = RecordFormatter::new(video_start_epoch_secs).format_all(&records)?;

    let author = author_from_file(&job.input).map_err(|e| DriverError::io_error(&job.input, e))?;
    if author.is_empty() {
        tracing::warn!("No AUTHOR found in {}", job.input.display());
    }
    let header = CreditHeader::new(conversion, author, now);

    let base_log = if job.config.use_staging {
        locate_staged_log(&job.config, &job.output)?
    } else {
        job.output.clone()
    };

    let merge = merge_log_into(&base_log, &job.output, &formatted, &header.render())?;
    tracing::info!(
        "Merged {} records into {} ({} lines copied)",
        merge.records_written(),
        job.output.display(),
        merge.lines_copied
    );

    Ok(ConversionSummary {
        clip_offset_secs,
        video_start_epoch_secs,
        nodes: graph.node_count(),
        records: formatted.len(),
        author: header.author().to_string(),
        merge,
    })
}

/// Run `job` with its exported JSON graph and the current time
///
/// # Errors
/// See [`run`].
pub fn convert(job: &ConversionJob) -> Result<ConversionSummary, DriverError> {
    let source = JsonGraphSource::new(job.graph_path());
    run(job, &source, Utc::now())
}
