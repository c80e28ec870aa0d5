//! Testing utilities for the eaf2seg workspace
//!
//! Shared graph builders, sample logs and time constants.

#![allow(missing_docs)]

use seg_graph::{AnnotationGraph, GraphDocument, GraphNode, Region};

/// 2007-03-07 19:00:00 UTC, the start of `2007-03-07_1900_*` recordings
pub const VIDEO_START_2007_03_07_1900: i64 = 1_173_294_000;

pub const TEST_HEADER: &str =
    "GES_03|2016-02-09 23:10|Source_Program=eaf2seg|Source_Person=Jane Doe\n";

/// Builds graphs the way the annotation exporter lays them out:
/// node `a1..<Tier>..na<n>` anchored to region `a1..<Tier>..ra<n>`
#[derive(Debug, Default)]
pub struct GraphFixture {
    nodes: Vec<GraphNode>,
    regions: Vec<Region>,
}

impl GraphFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotation with text
    pub fn annotation(self, tier: &str, start_ms: u64, end_ms: u64, value: &str) -> Self {
        self.push(tier, start_ms, end_ms, Some(value))
    }

    /// Annotation without any feature
    pub fn bare(self, tier: &str, start_ms: u64, end_ms: u64) -> Self {
        self.push(tier, start_ms, end_ms, None)
    }

    /// Node whose region is never added
    pub fn orphan(mut self, tier: &str) -> Self {
        let seq = self.nodes.len() + 1;
        self.nodes.push(GraphNode::new(format!("a1..{tier}..na{seq}").as_str()));
        self
    }

    fn push(mut self, tier: &str, start_ms: u64, end_ms: u64, value: Option<&str>) -> Self {
        let seq = self.nodes.len() + 1;
        let mut node = GraphNode::new(format!("a1..{tier}..na{seq}").as_str());
        if let Some(value) = value {
            node = node.with_value(value);
        }
        self.nodes.push(node);
        self.regions
            .push(Region::new(format!("a1..{tier}..ra{seq}").as_str(), start_ms, end_ms));
        self
    }

    pub fn document(self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes,
            regions: self.regions,
        }
    }

    pub fn build(self) -> AnnotationGraph {
        self.document().into_graph()
    }

    /// Serialized graph document, as the exporter would write it
    pub fn to_json(self) -> String {
        serde_json::to_string_pretty(&self.document()).unwrap()
    }
}

/// Join lines into a newline-terminated log
pub fn seg_log(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// A small caption log for the 2007-03-07 19:00 recording
pub fn sample_seg_log() -> String {
    seg_log(&[
        "TOP|20070307190000|2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show",
        "COL|Communication Studies Archive, UCLA",
        "UID|4d7e9b0e-8b4a-11e5-a0f0-0f0c0a0b0c0d",
        "20070307190002.000|20070307190003.000|CC1|Welcome back.",
        "20070307190005.000|20070307190007.000|CC1|Today on the show",
        "20070307190009.000|20070307190011.000|CC1|we talk to families.",
        "END|20070307200000|2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show",
    ])
}

/// Minimal annotation document text carrying an author attribute
pub fn sample_eaf(author: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ANNOTATION_DOCUMENT AUTHOR=\"{author}\" DATE=\"2016-02-09T23:10:00+00:00\" FORMAT=\"2.8\" VERSION=\"2.8\">\n\
         <HEADER MEDIA_FILE=\"\" TIME_UNITS=\"milliseconds\"/>\n\
         </ANNOTATION_DOCUMENT>\n"
    )
}
