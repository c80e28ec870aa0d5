//! Credit header line
//!
//! Written once per run, right before the first inserted record:
//!
//! ```text
//! GES_03|2016-02-09 23:10|Source_Program=eaf2seg|Source_Person=Elizabeth Zima
//! ```

use crate::config::ConversionConfig;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::io::BufRead;
use std::path::Path;

static AUTHOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<ANNOTATION_DOCUMENT.*?AUTHOR="([^"]*)""#).expect("valid regex")
});

/// Provenance line for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditHeader {
    primary_tag: String,
    generated_at: DateTime<Utc>,
    source_program: String,
    author: String,
}

impl CreditHeader {
    /// Create header for a run
    #[must_use]
    pub fn new(
        config: &ConversionConfig,
        author: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            primary_tag: config.primary_tag.clone(),
            generated_at,
            source_program: config.source_program.clone(),
            author: author.into(),
        }
    }

    /// Author recorded in the header
    #[inline]
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Render the newline-terminated header line
    #[must_use]
    pub fn render(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for CreditHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|Source_Program={}|Source_Person={}",
            self.primary_tag,
            self.generated_at.format("%Y-%m-%d %H:%M"),
            self.source_program,
            self.author
        )
    }
}

/// First `AUTHOR` attribute of the annotation document header, if any
///
/// Scans line by line and stops at the first match. Invalid UTF-8 is
/// replaced rather than rejected.
///
/// # Errors
/// Propagates read errors.
pub fn extract_author<R: BufRead>(mut reader: R) -> std::io::Result<Option<String>> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(caps) = AUTHOR_PATTERN.captures(&line) {
            return Ok(Some(caps[1].to_string()));
        }
    }
}

/// [`extract_author`] over a file; a missing author yields an empty name
///
/// # Errors
/// Propagates open/read errors.
pub fn author_from_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    Ok(extract_author(std::io::BufReader::new(file))?.unwrap_or_default())
}
