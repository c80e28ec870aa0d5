//! Annotation records
//!
//! A record is every tier value that shares one time window, stamped with
//! the run's primary tag. Records are built by the aggregator and read by
//! the formatter; nothing mutates them in between.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Clip-relative time window in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start offset from the start of the clip
    pub start_ms: u64,
    /// End offset from the start of the clip
    pub end_ms: u64,
}

impl TimeWindow {
    /// Create window
    #[inline]
    #[must_use]
    pub const fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    /// True when both edges are within `tolerance_ms` of `other`'s
    #[inline]
    #[must_use]
    pub fn within(&self, other: &TimeWindow, tolerance_ms: u64) -> bool {
        self.start_ms.abs_diff(other.start_ms) <= tolerance_ms
            && self.end_ms.abs_diff(other.end_ms) <= tolerance_ms
    }
}

/// All tier values observed for one time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    tier_values: IndexMap<String, String>,
    window: TimeWindow,
    primary_tag: String,
}

impl AnnotationRecord {
    /// Create a record holding a single tier value
    #[must_use]
    pub fn new(
        window: TimeWindow,
        primary_tag: impl Into<String>,
        tier: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut tier_values = IndexMap::new();
        tier_values.insert(tier.into(), value.into());
        Self {
            tier_values,
            window,
            primary_tag: primary_tag.into(),
        }
    }

    /// With another tier value, overwriting any earlier value for that tier
    #[inline]
    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_tier(tier, value);
        self
    }

    pub(crate) fn set_tier(&mut self, tier: impl Into<String>, value: impl Into<String>) {
        self.tier_values.insert(tier.into(), value.into());
    }

    /// Value for a tier, if present
    #[inline]
    #[must_use]
    pub fn tier(&self, tier: &str) -> Option<&str> {
        self.tier_values.get(tier).map(String::as_str)
    }

    /// All (tier, value) pairs in first-seen order
    pub fn tiers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tier_values
            .iter()
            .map(|(tier, value)| (tier.as_str(), value.as_str()))
    }

    /// Number of tiers present
    #[inline]
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tier_values.len()
    }

    /// Time window
    #[inline]
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Start offset in milliseconds
    #[inline]
    #[must_use]
    pub fn start_ms(&self) -> u64 {
        self.window.start_ms
    }

    /// End offset in milliseconds
    #[inline]
    #[must_use]
    pub fn end_ms(&self) -> u64 {
        self.window.end_ms
    }

    /// Run-level classification tag
    #[inline]
    #[must_use]
    pub fn primary_tag(&self) -> &str {
        &self.primary_tag
    }
}
