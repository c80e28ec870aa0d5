//! Chronological merge into an existing `.seg` log
//!
//! A single forward pass over the original log with one cursor over the
//! sorted records:
//! - **Data line** (first field is an 18-byte timestamp): write the credit
//!   header if it is still pending, then every record whose start is strictly
//!   earlier than the line's timestamp. Ties go to the existing line.
//! - **Terminal line** (`END|...`): write the header if still pending, then
//!   every remaining record regardless of time.
//! - **Anything else**: copied through, never triggers output.
//!
//! Original lines are always copied byte-for-byte, after whatever they
//! triggered. File merges go to a sibling temporary file that replaces the
//! log only once the whole pass has succeeded.

use crate::error::{MergeError, TimestampError};
use crate::formatter::FormattedRecord;
use crate::timestamp::{SegTimestamp, TIMESTAMP_LEN};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Prefix of the line that closes a `.seg` log
pub const TERMINAL_MARKER: &[u8] = b"END|";

const FIELD_SEPARATOR: u8 = b'|';

/// What a line of the original log means to the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Timestamped data line
    Data(SegTimestamp),
    /// `END|` line
    Terminal,
    /// Header, comment, blank line or anything else
    Passthrough,
}

impl LineKind {
    /// Classify one raw line (terminator optional)
    ///
    /// # Errors
    /// `TimestampError` when the first field has timestamp length but is not
    /// a valid timestamp.
    pub fn classify(line: &[u8]) -> Result<Self, TimestampError> {
        let body = strip_terminator(line);
        let first_field = body
            .split(|&b| b == FIELD_SEPARATOR)
            .next()
            .unwrap_or_default();

        if first_field.len() == TIMESTAMP_LEN {
            let text = std::str::from_utf8(first_field).map_err(|_| {
                TimestampError::InvalidFormat(String::from_utf8_lossy(first_field).into_owned())
            })?;
            return SegTimestamp::parse(text).map(LineKind::Data);
        }
        if body.starts_with(TERMINAL_MARKER) {
            return Ok(LineKind::Terminal);
        }
        Ok(LineKind::Passthrough)
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Where the merge pass stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// Credit header not yet written
    BeforeFirstInsert,
    /// Header written, records still pending
    Streaming,
    /// Header written and every record emitted
    Done,
}

/// Outcome of a merge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Original lines copied through
    pub lines_copied: usize,
    /// Records placed before an existing data line
    pub records_inserted: usize,
    /// Records flushed at the terminal line
    pub records_flushed_at_end: usize,
    /// Whether the credit header was written
    pub header_written: bool,
}

impl MergeReport {
    /// Total records written
    #[inline]
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_inserted + self.records_flushed_at_end
    }
}

/// Line-at-a-time merge state machine
///
/// Feed every original line through [`LogMerger::process_line`], then call
/// [`LogMerger::finish`].
#[derive(Debug)]
pub struct LogMerger<'a> {
    records: &'a [FormattedRecord],
    header: &'a str,
    cursor: usize,
    lines_seen: usize,
    state: MergeState,
    report: MergeReport,
}

impl<'a> LogMerger<'a> {
    /// Create merger over records sorted ascending by sort key
    #[must_use]
    pub fn new(records: &'a [FormattedRecord], header: &'a str) -> Self {
        debug_assert!(
            records.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()),
            "records must be sorted by sort key"
        );
        Self {
            records,
            header,
            cursor: 0,
            lines_seen: 0,
            state: MergeState::BeforeFirstInsert,
            report: MergeReport::default(),
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> MergeState {
        self.state
    }

    /// Records not yet written
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.records.len() - self.cursor
    }

    /// Handle one original line (including its terminator, if any)
    ///
    /// # Errors
    /// - `MergeError::MalformedTimestamp` for a bad data-line timestamp
    /// - `MergeError::Stream` on write failure
    pub fn process_line<W: Write>(&mut self, line: &[u8], out: &mut W) -> Result<(), MergeError> {
        self.lines_seen += 1;
        let kind = LineKind::classify(line).map_err(|source| MergeError::MalformedTimestamp {
            line: self.lines_seen,
            source,
        })?;

        match kind {
            LineKind::Data(timestamp) => {
                self.ensure_header(out)?;
                while self.cursor < self.records.len()
                    && self.records[self.cursor].sort_key() < timestamp
                {
                    self.emit_next(out)?;
                    self.report.records_inserted += 1;
                }
            }
            LineKind::Terminal => {
                self.ensure_header(out)?;
                while self.cursor < self.records.len() {
                    self.emit_next(out)?;
                    self.report.records_flushed_at_end += 1;
                }
            }
            LineKind::Passthrough => {}
        }

        out.write_all(line)?;
        self.report.lines_copied += 1;
        Ok(())
    }

    /// Close the pass
    ///
    /// # Errors
    /// `MergeError::MissingTerminalMarker` if records are still pending,
    /// which means the log had no `END|` line after its last data line.
    pub fn finish(self) -> Result<MergeReport, MergeError> {
        let pending = self.pending();
        if pending > 0 {
            return Err(MergeError::MissingTerminalMarker { pending });
        }
        if !self.report.header_written {
            tracing::warn!("Log has no data or END| line; credit header was not written");
        }
        Ok(self.report)
    }

    fn ensure_header<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        if self.state == MergeState::BeforeFirstInsert {
            out.write_all(self.header.as_bytes())?;
            self.report.header_written = true;
            self.update_state();
        }
        Ok(())
    }

    fn emit_next<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.records[self.cursor].text().as_bytes())?;
        self.cursor += 1;
        self.update_state();
        Ok(())
    }

    fn update_state(&mut self) {
        if self.report.header_written {
            self.state = if self.cursor == self.records.len() {
                MergeState::Done
            } else {
                MergeState::Streaming
            };
        }
    }
}

/// Merge `records` into the log read from `reader`, writing to `writer`
///
/// `records` must be sorted ascending by sort key; `header` is written
/// verbatim and should end with a newline.
///
/// # Errors
/// See [`LogMerger::process_line`] and [`LogMerger::finish`].
pub fn merge_stream<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    records: &[FormattedRecord],
    header: &str,
) -> Result<MergeReport, MergeError> {
    let mut merger = LogMerger::new(records, header);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        merger.process_line(&line, writer)?;
    }
    merger.finish()
}

/// Merge `records` into the log at `path`, replacing it atomically
///
/// The merged log is written to a temporary file next to `path` and renamed
/// over it only after the whole pass succeeds. On any error the original
/// log is untouched and the temporary file is removed.
///
/// # Errors
/// See [`merge_log_into`].
pub fn merge_log_file(
    path: impl AsRef<Path>,
    records: &[FormattedRecord],
    header: &str,
) -> Result<MergeReport, MergeError> {
    let path = path.as_ref();
    merge_log_into(path, path, records, header)
}

/// Merge `records` into the log read from `source`, publishing at `dest`
///
/// `source` and `dest` may be the same file. The result is staged in a
/// temporary file in `dest`'s directory and renamed over `dest` only after
/// the whole pass succeeds, so `dest` is never seen half written and keeps
/// its previous content on any error. The merged file takes `source`'s
/// permissions.
///
/// # Errors
/// - `MergeError::Io` if `source` cannot be opened or the temp file created
/// - `MergeError::Persist` if the final rename fails
/// - anything [`merge_stream`] returns
pub fn merge_log_into(
    source: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    records: &[FormattedRecord],
    header: &str,
) -> Result<MergeReport, MergeError> {
    let (source, dest) = (source.as_ref(), dest.as_ref());
    let original = File::open(source).map_err(|e| MergeError::io_error(source, e))?;
    let permissions = original
        .metadata()
        .map_err(|e| MergeError::io_error(source, e))?
        .permissions();

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = dest
        .file_name()
        .map(|name| format!(".{}.", name.to_string_lossy()))
        .unwrap_or_else(|| ".seg.".to_string());
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| MergeError::io_error(dir, e))?;

    let report = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let report = merge_stream(BufReader::new(original), &mut writer, records, header)?;
        writer.flush()?;
        report
    };
    temp.as_file()
        .sync_all()
        .map_err(|e| MergeError::io_error(temp.path(), e))?;
    std::fs::set_permissions(temp.path(), permissions)
        .map_err(|e| MergeError::io_error(temp.path(), e))?;

    temp.persist(dest).map_err(|e| MergeError::Persist {
        path: dest.to_path_buf(),
        source: e.error,
    })?;

    tracing::info!(
        "Merged {} records into {} ({} before existing lines, {} at END)",
        report.records_written(),
        dest.display(),
        report.records_inserted,
        report.records_flushed_at_end
    );
    Ok(report)
}
