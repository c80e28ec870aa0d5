//! Staged base logs
//!
//! Fresh `.seg` logs are published to a dated staging tree. A run with
//! staging enabled reads its base log from there and publishes the merged
//! result at the destination; the destination is only written by the
//! final rename of the merge.

use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::naming::staged_log_path;
use std::path::{Path, PathBuf};

/// Create the destination's parent directory if needed
///
/// # Errors
/// `DriverError::Io` if the directory cannot be created.
pub fn ensure_parent_dir(output: &Path) -> Result<(), DriverError> {
    let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| DriverError::io_error(dir, e))?;
        tracing::info!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Find the staged base log for `output` and prepare its destination
///
/// Returns the staged path the merge should read from. The staged file is
/// never modified.
///
/// # Errors
/// - `DriverError::InvalidLogName` if the staged path cannot be derived
/// - `DriverError::MissingStagedLog` if there is no staged log
/// - `DriverError::Io` if the destination directory cannot be created
pub fn locate_staged_log(config: &DriverConfig, output: &Path) -> Result<PathBuf, DriverError> {
    let staged = staged_log_path(&config.staging_root, output)?;
    if !staged.is_file() {
        return Err(DriverError::MissingStagedLog(staged));
    }

    ensure_parent_dir(output)?;
    tracing::info!("Using staged log {}", staged.display());
    Ok(staged)
}
