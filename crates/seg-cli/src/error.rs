//! Driver error taxonomy
//!
//! Every failure aborts the run; none are retried. A run can be repeated from
//! scratch once the cause is fixed.

use seg_core::{AggregateError, ConfigError, MergeError, TimestampError};
use seg_graph::GraphError;
use std::path::PathBuf;

/// Errors from a conversion run
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Source annotation file does not exist
    #[error("the input file does not exist: {0}")]
    MissingInput(PathBuf),

    /// Destination log is absent and staging is disabled
    #[error("the output file does not exist (staging is turned off): {0}")]
    MissingBaseLog(PathBuf),

    /// Staged copy of the log could not be found
    #[error("could not find the .seg file in {0}")]
    MissingStagedLog(PathBuf),

    /// Staging would overwrite an existing destination log
    #[error("the output file already exists: {0} (pass --overwrite to replace it)")]
    OutputExists(PathBuf),

    /// Destination name does not start with `YYYY-MM-DD_HHMM`
    #[error("cannot read the recording start time from log name: {0}")]
    InvalidLogName(PathBuf),

    /// IO failure outside the merge pass
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Annotation graph could not be loaded
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Graph is malformed
    #[error("aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    /// Record window cannot be placed in calendar time
    #[error("timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// Merge pass failed; the destination log is unchanged
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DriverError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
