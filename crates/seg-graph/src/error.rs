//! Error types for the annotation graph
//!
//! Everything here is a malformed-graph condition from the caller's point of
//! view, except `Io` which covers reading an exported graph from disk.

use std::path::PathBuf;

/// Errors raised while loading or querying an annotation graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node identifier does not follow the `<prefix>..<Tier>..na<seq>` layout
    #[error("invalid node id '{id}': {reason}")]
    InvalidNodeId {
        /// Offending identifier
        id: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// The region correlated with a node is not present in the graph
    #[error("region '{region}' for node '{node}' not found")]
    UnresolvedRegion {
        /// Node that referenced the region
        node: String,
        /// Region identifier that could not be resolved
        region: String,
    },

    /// Region does not carry a (start, end) anchor pair
    #[error("region '{region}' has {found} anchors, expected 2")]
    MissingAnchor {
        /// Region identifier
        region: String,
        /// Number of anchors actually present
        found: usize,
    },

    /// IO error while reading an exported graph
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Exported graph document could not be decoded
    #[error("failed to decode graph document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GraphError {
    /// Create invalid node id error
    pub fn invalid_node_id(id: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidNodeId {
            id: id.into(),
            reason,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
