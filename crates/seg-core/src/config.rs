//! Conversion configuration
//!
//! Run-level settings passed explicitly into the aggregator, formatter and
//! credit header. Loadable from TOML:
//!
//! ```toml
//! primary_tag = "GES_03"
//! tolerance_ms = 0
//! source_program = "eaf2seg"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default classification tag stamped on every record
pub const DEFAULT_PRIMARY_TAG: &str = "GES_03";

/// Default name written into the credit header
pub const DEFAULT_SOURCE_PROGRAM: &str = "eaf2seg";

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Tag stamped onto every record of the run
    pub primary_tag: String,
    /// Maximum start/end difference for two annotations to share a record
    pub tolerance_ms: u64,
    /// Program name recorded in the credit header
    pub source_program: String,
}

impl ConversionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With primary tag
    #[inline]
    #[must_use]
    pub fn with_primary_tag(mut self, tag: impl Into<String>) -> Self {
        self.primary_tag = tag.into();
        self
    }

    /// With grouping tolerance
    #[inline]
    #[must_use]
    pub fn with_tolerance_ms(mut self, tolerance_ms: u64) -> Self {
        self.tolerance_ms = tolerance_ms;
        self
    }

    /// With source program name
    #[inline]
    #[must_use]
    pub fn with_source_program(mut self, program: impl Into<String>) -> Self {
        self.source_program = program.into();
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on invalid TOML, or a validation error.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as `from_toml`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Check that values fit the `.seg` line layout
    ///
    /// # Errors
    /// `ConfigError::InvalidPrimaryTag` for empty tags or tags containing
    /// a field separator or line break.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tag = &self.primary_tag;
        if tag.is_empty() || tag.contains(&['|', '\n', '\r'][..]) {
            return Err(ConfigError::InvalidPrimaryTag(tag.clone()));
        }
        Ok(())
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            primary_tag: DEFAULT_PRIMARY_TAG.to_string(),
            tolerance_ms: 0,
            source_program: DEFAULT_SOURCE_PROGRAM.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConversionConfig::new();
        assert_eq!(config.primary_tag, "GES_03");
        assert_eq!(config.tolerance_ms, 0);
        assert_eq!(config.source_program, "eaf2seg");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ConversionConfig::from_toml("tolerance_ms = 40\n").unwrap();
        assert_eq!(config.tolerance_ms, 40);
        assert_eq!(config.primary_tag, DEFAULT_PRIMARY_TAG);
    }

    #[test]
    fn rejects_pipe_in_tag() {
        let err = ConversionConfig::from_toml("primary_tag = \"GES|03\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrimaryTag(_)));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(matches!(
            ConversionConfig::from_toml("tolerance_ms = \"soon\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
