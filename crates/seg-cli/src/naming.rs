//! File naming conventions
//!
//! - `.seg` logs start with the recording start: `2007-03-07_1900_US_KTTV-FOX_....seg`
//! - annotated clips carry their offset range: `..._797-1277.eaf` starts 797 s in
//! - staged logs live under `<root>/2007/2007-03/2007-03-07/<log name>`

use crate::error::DriverError;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static CLIP_OFFSET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(\d+)-\d+\.eaf").expect("valid regex"));

/// Leading `YYYY-MM-DD_HHMM` of a log name
const LOG_DATE_LEN: usize = 15;

/// Extension of the exported graph next to an annotation file
pub const GRAPH_EXTENSION: &str = "graph.json";

/// Seconds from the start of the recording to the start of the clip
///
/// Zero when the file name carries no `_<start>-<end>.eaf` range.
#[must_use]
pub fn clip_offset_secs(input: &Path) -> i64 {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    CLIP_OFFSET_PATTERN
        .captures(&name)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

fn log_date_prefix(output: &Path) -> Option<String> {
    let name = output.file_name()?.to_str()?;
    name.get(..LOG_DATE_LEN).map(str::to_string)
}

/// Recording start encoded in the log name, as epoch seconds (UTC)
///
/// # Errors
/// `DriverError::InvalidLogName` if the name does not start with
/// `YYYY-MM-DD_HHMM`.
pub fn recording_start_epoch_secs(output: &Path) -> Result<i64, DriverError> {
    let invalid = || DriverError::InvalidLogName(output.to_path_buf());
    let prefix = log_date_prefix(output).ok_or_else(invalid)?;
    let start = NaiveDateTime::parse_from_str(&prefix, "%Y-%m-%d_%H%M").map_err(|_| invalid())?;
    Ok(start.and_utc().timestamp())
}

/// Where the staged copy of `output` lives under `staging_root`
///
/// # Errors
/// `DriverError::InvalidLogName` if the name does not start with a date.
pub fn staged_log_path(staging_root: &Path, output: &Path) -> Result<PathBuf, DriverError> {
    // Validates the whole prefix, not just the slices used below
    recording_start_epoch_secs(output)?;
    let invalid = || DriverError::InvalidLogName(output.to_path_buf());
    let prefix = log_date_prefix(output).ok_or_else(invalid)?;
    let name = output.file_name().ok_or_else(invalid)?;

    Ok(staging_root
        .join(&prefix[0..4])
        .join(&prefix[0..7])
        .join(&prefix[0..10])
        .join(name))
}

/// Default exported-graph path for an annotation file
#[must_use]
pub fn default_graph_path(input: &Path) -> PathBuf {
    input.with_extension(GRAPH_EXTENSION)
}
