//! Error types for the conversion pipeline
//!
//! Covers:
//! - Aggregation over a malformed graph
//! - Timestamp parsing and range failures
//! - Log merge IO and precondition failures
//! - Configuration loading

use seg_graph::GraphError;
use std::path::PathBuf;

/// Errors while grouping graph nodes into records
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// Graph is malformed (bad node ID, unresolved region, missing anchors)
    #[error("malformed graph: {0}")]
    MalformedGraph(#[from] GraphError),

    /// Region anchors run backwards
    #[error("region for node '{node}' ends before it starts ({start_ms} > {end_ms})")]
    InvertedWindow {
        /// Node whose region is inverted
        node: String,
        /// Start anchor
        start_ms: u64,
        /// End anchor
        end_ms: u64,
    },
}

/// Errors converting between `.seg` timestamps and epoch time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// Field is not `YYYYMMDDHHMMSS.mmm`
    #[error("invalid timestamp '{0}': expected YYYYMMDDHHMMSS.mmm")]
    InvalidFormat(String),

    /// Digits parse but do not name a real date/time
    #[error("timestamp '{0}' is not a valid calendar time")]
    OutOfRange(String),
}

/// Errors during the log merge pass
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// IO error while reading the original log or writing the merged one
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stream-level IO error (no path available)
    #[error("io error during merge: {0}")]
    Stream(#[from] std::io::Error),

    /// A data line's leading timestamp could not be parsed
    #[error("line {line}: {source}")]
    MalformedTimestamp {
        /// 1-based line number in the original log
        line: usize,
        /// Parse failure
        #[source]
        source: TimestampError,
    },

    /// The log ended without an `END|` line while records were still pending
    #[error("log has no terminal END| line; {pending} record(s) would be lost")]
    MissingTerminalMarker {
        /// Records that never found a position
        pending: usize,
    },

    /// Swapping the merged log into place failed
    #[error("failed to replace {path}: {source}")]
    Persist {
        /// Destination log
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors loading conversion configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Primary tag would corrupt the pipe-delimited layout
    #[error("primary tag must be non-empty and contain no '|' or newline: {0:?}")]
    InvalidPrimaryTag(String),
}
