//! Driver configuration
//!
//! ```toml
//! primary_tag = "GES_03"
//! tolerance_ms = 0
//! use_staging = true
//! staging_root = "/sweep"
//! overwrite = false
//! ```

use seg_core::{ConfigError, ConversionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of staged `.seg` logs
pub const DEFAULT_STAGING_ROOT: &str = "/sweep";

/// Settings for a driver run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Conversion settings
    #[serde(flatten)]
    pub conversion: ConversionConfig,
    /// Copy the base log from the staging tree before merging
    pub use_staging: bool,
    /// Root of the `YYYY/YYYY-MM/YYYY-MM-DD` staging tree
    pub staging_root: PathBuf,
    /// Allow staging to replace an existing destination log
    pub overwrite: bool,
}

impl DriverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With conversion settings
    #[inline]
    #[must_use]
    pub fn with_conversion(mut self, conversion: ConversionConfig) -> Self {
        self.conversion = conversion;
        self
    }

    /// With staging on or off
    #[inline]
    #[must_use]
    pub fn with_staging(mut self, use_staging: bool) -> Self {
        self.use_staging = use_staging;
        self
    }

    /// With staging root
    #[inline]
    #[must_use]
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// With overwrite permission
    #[inline]
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` or `ConfigError::Parse`, or a validation error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.conversion.validate()?;
        Ok(config)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            conversion: ConversionConfig::default(),
            use_staging: true,
            staging_root: PathBuf::from(DEFAULT_STAGING_ROOT),
            overwrite: false,
        }
    }
}
