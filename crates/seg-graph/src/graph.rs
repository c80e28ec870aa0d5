//! In-memory annotation graph
//!
//! Nodes keep the order in which the exporter listed them; the aggregator
//! depends on that order for its first-match grouping.

use crate::error::GraphError;
use crate::ids::{NodeId, RegionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Feature key carrying the annotation text
pub const ANNOTATION_VALUE: &str = "annotation_value";

/// A time region with its anchors in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier
    pub id: RegionId,
    /// Raw anchors; a well-formed region has exactly (start, end)
    pub anchors: Vec<u64>,
}

impl Region {
    /// Create a region from a start/end pair
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<RegionId>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            id: id.into(),
            anchors: vec![start_ms, end_ms],
        }
    }

    /// The (start, end) anchor pair
    ///
    /// # Errors
    /// `GraphError::MissingAnchor` unless exactly two anchors are present.
    pub fn span(&self) -> Result<(u64, u64), GraphError> {
        match self.anchors.as_slice() {
            [start, end] => Ok((*start, *end)),
            other => Err(GraphError::MissingAnchor {
                region: self.id.to_string(),
                found: other.len(),
            }),
        }
    }
}

/// A single annotation node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identifier
    pub id: NodeId,
    /// Feature map; at most the `annotation_value` entry in practice
    #[serde(default)]
    pub features: IndexMap<String, String>,
    /// Region recorded by the exporter; derived from the ID when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionId>,
}

impl GraphNode {
    /// Create a node without features
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            features: IndexMap::new(),
            region: None,
        }
    }

    /// With annotation text
    #[inline]
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.features
            .insert(ANNOTATION_VALUE.to_string(), value.into());
        self
    }

    /// With an explicit region reference
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<RegionId>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Annotation text, empty when the node carries no value
    #[must_use]
    pub fn annotation_value(&self) -> &str {
        self.features
            .get(ANNOTATION_VALUE)
            .map_or("", String::as_str)
    }
}

/// Annotation graph: nodes plus the regions they point at
#[derive(Debug, Clone, Default)]
pub struct AnnotationGraph {
    nodes: IndexMap<NodeId, GraphNode>,
    regions: HashMap<RegionId, Region>,
}

impl AnnotationGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node with the same ID
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert a region, replacing any region with the same ID
    pub fn add_region(&mut self, region: Region) {
        self.regions.insert(region.id.clone(), region);
    }

    /// Nodes in exporter order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of regions
    #[inline]
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Resolve the region a node is anchored to
    ///
    /// An explicit region on the node wins over the ID-derived one.
    ///
    /// # Errors
    /// - `GraphError::InvalidNodeId` if no region can be derived
    /// - `GraphError::UnresolvedRegion` if the region is not in the graph
    pub fn region_of(&self, node: &GraphNode) -> Result<&Region, GraphError> {
        let region_id = match &node.region {
            Some(id) => id.clone(),
            None => node.id.region_id()?,
        };
        self.regions
            .get(&region_id)
            .ok_or_else(|| GraphError::UnresolvedRegion {
                node: node.id.to_string(),
                region: region_id.to_string(),
            })
    }
}
