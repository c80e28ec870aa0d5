//! Time-window aggregation
//!
//! Groups raw graph nodes into `AnnotationRecord`s keyed by time window.
//! A node joins the FIRST existing record (in creation order) whose window is
//! within tolerance on both edges; otherwise it starts a new record. There is
//! no nearest-match search: with a non-zero tolerance, adjacent annotations
//! group by creation order, and output must stay reproducible.

use crate::config::ConversionConfig;
use crate::error::AggregateError;
use crate::record::{AnnotationRecord, TimeWindow};
use seg_graph::AnnotationGraph;

/// Accumulates tier values into per-window records
#[derive(Debug, Clone)]
pub struct Aggregator {
    tolerance_ms: u64,
    primary_tag: String,
    records: Vec<AnnotationRecord>,
}

impl Aggregator {
    /// Create aggregator from run configuration
    #[must_use]
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            tolerance_ms: config.tolerance_ms,
            primary_tag: config.primary_tag.clone(),
            records: Vec::new(),
        }
    }

    /// Add one tier value observed over `window`
    ///
    /// Empty values are kept: an empty speech turn is still a speech turn.
    pub fn observe(&mut self, tier: &str, window: TimeWindow, value: &str) {
        let tolerance = self.tolerance_ms;
        match self
            .records
            .iter_mut()
            .find(|record| record.window().within(&window, tolerance))
        {
            Some(record) => record.set_tier(tier, value),
            None => self.records.push(AnnotationRecord::new(
                window,
                self.primary_tag.as_str(),
                tier,
                value,
            )),
        }
    }

    /// Finish aggregation
    #[inline]
    #[must_use]
    pub fn finish(self) -> Vec<AnnotationRecord> {
        self.records
    }

    /// Feed every node of `graph`, in exporter order
    ///
    /// # Errors
    /// - `AggregateError::MalformedGraph` if a node's tier or region cannot
    ///   be resolved, or its region lacks an anchor pair
    /// - `AggregateError::InvertedWindow` if a region ends before it starts
    pub fn observe_graph(&mut self, graph: &AnnotationGraph) -> Result<(), AggregateError> {
        for node in graph.nodes() {
            let tier = node.id.tier()?;
            let (start_ms, end_ms) = graph.region_of(node)?.span()?;
            if start_ms > end_ms {
                return Err(AggregateError::InvertedWindow {
                    node: node.id.to_string(),
                    start_ms,
                    end_ms,
                });
            }
            self.observe(tier, TimeWindow::new(start_ms, end_ms), node.annotation_value());
        }
        Ok(())
    }
}

/// Group all nodes of `graph` into records
///
/// Fails on the first malformed node without returning partial output.
///
/// # Errors
/// See [`Aggregator::observe_graph`].
pub fn aggregate(
    graph: &AnnotationGraph,
    config: &ConversionConfig,
) -> Result<Vec<AnnotationRecord>, AggregateError> {
    tracing::info!("Number of annotation elements: {}", graph.node_count());
    let mut aggregator = Aggregator::new(config);
    aggregator.observe_graph(graph)?;
    let records = aggregator.finish();
    tracing::debug!("Aggregated into {} records", records.len());
    Ok(records)
}
