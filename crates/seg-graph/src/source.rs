//! Graph sources
//!
//! The annotation tool's own file format is parsed elsewhere; what reaches
//! this crate is the exported graph document:
//!
//! ```json
//! {
//!   "nodes":   [{ "id": "a1..Speech..na1", "features": { "annotation_value": "hello" } }],
//!   "regions": [{ "id": "a1..Speech..ra1", "anchors": [1000, 4000] }]
//! }
//! ```

use crate::error::GraphError;
use crate::graph::{AnnotationGraph, GraphNode, Region};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Anything that can produce an annotation graph
pub trait GraphSource {
    /// Load the graph
    ///
    /// # Errors
    /// Implementation-specific; malformed input maps to `GraphError`.
    fn load(&self) -> Result<AnnotationGraph, GraphError>;
}

/// Serialized form of an annotation graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes in exporter order
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Regions referenced by the nodes
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl GraphDocument {
    /// Decode a document from JSON text
    ///
    /// # Errors
    /// `GraphError::Decode` on invalid JSON or schema mismatch.
    pub fn from_json(content: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the in-memory graph
    #[must_use]
    pub fn into_graph(self) -> AnnotationGraph {
        let mut graph = AnnotationGraph::new();
        for region in self.regions {
            graph.add_region(region);
        }
        for node in self.nodes {
            graph.add_node(node);
        }
        graph
    }
}

/// Reads a graph document from a JSON file
#[derive(Debug, Clone)]
pub struct JsonGraphSource {
    path: PathBuf,
}

impl JsonGraphSource {
    /// Create source for path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSource for JsonGraphSource {
    fn load(&self) -> Result<AnnotationGraph, GraphError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| GraphError::io_error(&self.path, e))?;
        let graph = GraphDocument::from_json(&content)?.into_graph();
        tracing::debug!(
            "Loaded graph from {}: {} nodes, {} regions",
            self.path.display(),
            graph.node_count(),
            graph.region_count()
        );
        Ok(graph)
    }
}

impl GraphSource for AnnotationGraph {
    fn load(&self) -> Result<AnnotationGraph, GraphError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"{
        "nodes": [
            { "id": "a1..Speech..na1", "features": { "annotation_value": "hello" } },
            { "id": "a1..Speaker..na2", "features": { "annotation_value": "A" } },
            { "id": "a1..Speech..na3" }
        ],
        "regions": [
            { "id": "a1..Speech..ra1", "anchors": [1000, 4000] },
            { "id": "a1..Speaker..ra2", "anchors": [1000, 4000] },
            { "id": "a1..Speech..ra3", "anchors": [5000, 6000] }
        ]
    }"#;

    #[test]
    fn decodes_document() {
        let graph = GraphDocument::from_json(DOC).unwrap().into_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.region_count(), 3);

        let values: Vec<_> = graph.nodes().map(GraphNode::annotation_value).collect();
        assert_eq!(values, vec!["hello", "A", ""]);
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            GraphDocument::from_json("{ nodes: "),
            Err(GraphError::Decode(_))
        ));
    }

    #[test]
    fn json_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();

        let graph = JsonGraphSource::new(file.path()).load().unwrap();
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn json_source_missing_file() {
        let source = JsonGraphSource::new("/nonexistent/graph.json");
        assert!(matches!(source.load(), Err(GraphError::Io { .. })));
    }
}
