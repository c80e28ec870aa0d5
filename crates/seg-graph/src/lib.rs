//! Annotation graph model
//!
//! The seam between the external annotation tooling and the `.seg`
//! conversion pipeline:
//! - Typed node and region identifiers
//! - An in-memory graph with explicit node → region lookup
//! - `GraphSource` for loading graphs exported by the annotation parser

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod graph;
pub mod ids;
pub mod source;

pub use error::GraphError;
pub use graph::{AnnotationGraph, GraphNode, Region, ANNOTATION_VALUE};
pub use ids::{NodeId, RegionId};
pub use source::{GraphDocument, GraphSource, JsonGraphSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
