//! Node and region identifiers
//!
//! Node IDs produced by the annotation tool look like
//! `a1..Speech..na12`: the second `..` field names the tier, and the
//! correlated region carries the same ID with the last `na` replaced by `ra`
//! (`a1..Speech..ra12`). That correlation is only ever derived here.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

const TIER_SEPARATOR: &str = "..";
const NODE_MARKER: &str = "na";
const REGION_MARKER: &str = "ra";

/// Identifier of a graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a raw node identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tier name encoded in the identifier
    ///
    /// # Errors
    /// `GraphError::InvalidNodeId` if the identifier has no tier field.
    pub fn tier(&self) -> Result<&str, GraphError> {
        self.0
            .split(TIER_SEPARATOR)
            .nth(1)
            .filter(|tier| !tier.is_empty())
            .ok_or_else(|| GraphError::invalid_node_id(&self.0, "missing tier field"))
    }

    /// Sequence index following the trailing `na` marker, if numeric
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        let (_, tail) = self.0.rsplit_once(NODE_MARKER)?;
        tail.parse().ok()
    }

    /// Region identifier correlated with this node
    ///
    /// # Errors
    /// `GraphError::InvalidNodeId` if the identifier has no `na` marker.
    pub fn region_id(&self) -> Result<RegionId, GraphError> {
        let (head, tail) = self
            .0
            .rsplit_once(NODE_MARKER)
            .ok_or_else(|| GraphError::invalid_node_id(&self.0, "missing 'na' marker"))?;
        Ok(RegionId(format!("{head}{REGION_MARKER}{tail}")))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of a time region
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Wrap a raw region identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_is_second_field() {
        let id = NodeId::new("a1..Speech..na12");
        assert_eq!(id.tier().unwrap(), "Speech");
    }

    #[test]
    fn tier_with_spaces_and_ampersand() {
        let id = NodeId::new("a4..Arms & hands..na3");
        assert_eq!(id.tier().unwrap(), "Arms & hands");
    }

    #[test]
    fn missing_tier_is_rejected() {
        assert!(NodeId::new("na12").tier().is_err());
        assert!(NodeId::new("a1....na2").tier().is_err());
    }

    #[test]
    fn region_replaces_last_marker() {
        // "na" inside the tier name must survive
        let id = NodeId::new("a1..Banana..na7");
        assert_eq!(id.region_id().unwrap().as_str(), "a1..Banana..ra7");
    }

    #[test]
    fn region_requires_marker() {
        assert!(NodeId::new("a1..Speech..x7").region_id().is_err());
    }

    #[test]
    fn sequence_parses_trailing_digits() {
        assert_eq!(NodeId::new("a1..Speech..na12").sequence(), Some(12));
        assert_eq!(NodeId::new("a1..Speech..nax").sequence(), None);
    }
}
