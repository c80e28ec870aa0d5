//! Record → `.seg` text
//!
//! Every line of a record shares the prefix
//! `<start>|<end>|<primary tag>`, followed by `|field=value` segments:
//!
//! ```text
//! 20070307190001.000|20070307190004.000|GES_03|Speaker=A|Speech=hello
//! 20070307190001.000|20070307190004.000|GES_03|Gesture=nod|Head=tilt
//! 20070307190001.000|20070307190004.000|GES_03|Comment=loud
//! ```

use crate::error::TimestampError;
use crate::record::AnnotationRecord;
use crate::schema::{self, Bucket};
use crate::timestamp::SegTimestamp;
use std::fmt::Write as _;

/// Rendered text of one record plus its merge position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRecord {
    text: String,
    sort_key: SegTimestamp,
}

impl FormattedRecord {
    /// Create from rendered text and key
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, sort_key: SegTimestamp) -> Self {
        Self {
            text: text.into(),
            sort_key,
        }
    }

    /// Newline-terminated lines, or empty if the record had nothing to show
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Absolute start time
    #[inline]
    #[must_use]
    pub fn sort_key(&self) -> SegTimestamp {
        self.sort_key
    }

    /// True when the record rendered no lines
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Renders records against an absolute clip start time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFormatter {
    video_start_epoch_secs: i64,
}

impl RecordFormatter {
    /// Create formatter; `video_start_epoch_secs` already includes the clip offset
    #[inline]
    #[must_use]
    pub const fn new(video_start_epoch_secs: i64) -> Self {
        Self {
            video_start_epoch_secs,
        }
    }

    /// Absolute clip start in epoch seconds
    #[inline]
    #[must_use]
    pub const fn video_start_epoch_secs(&self) -> i64 {
        self.video_start_epoch_secs
    }

    /// Render one record
    ///
    /// # Errors
    /// `TimestampError::OutOfRange` if the window cannot be placed in
    /// calendar time.
    pub fn format(&self, record: &AnnotationRecord) -> Result<FormattedRecord, TimestampError> {
        let start = SegTimestamp::at_offset(self.video_start_epoch_secs, record.start_ms())?;
        let end = SegTimestamp::at_offset(self.video_start_epoch_secs, record.end_ms())?;
        let prefix = format!("{start}|{end}|{}", record.primary_tag());

        let mut lines: Vec<String> = Bucket::ALL
            .iter()
            .map(|&bucket| bucket_segments(record, bucket))
            .collect();
        lines.push(overflow_segments(record));

        let mut text = String::new();
        for segments in lines.iter().filter(|s| !s.is_empty()) {
            text.push_str(&prefix);
            text.push_str(segments);
            text.push('\n');
        }

        Ok(FormattedRecord::new(text, start))
    }

    /// Render records in start-time order, dropping records with no lines
    ///
    /// The sort is stable, so records sharing a start keep their
    /// aggregation order.
    ///
    /// # Errors
    /// As [`RecordFormatter::format`].
    pub fn format_all(
        &self,
        records: &[AnnotationRecord],
    ) -> Result<Vec<FormattedRecord>, TimestampError> {
        let mut ordered: Vec<&AnnotationRecord> = records.iter().collect();
        ordered.sort_by_key(|record| record.start_ms());

        let mut formatted = Vec::with_capacity(ordered.len());
        for record in ordered {
            let rendered = self.format(record)?;
            if rendered.is_empty() {
                tracing::debug!(
                    "Skipping record at {}ms: no printable tiers",
                    record.start_ms()
                );
                continue;
            }
            formatted.push(rendered);
        }
        Ok(formatted)
    }
}

/// `|field=value` segments for a known bucket; empty values are kept
fn bucket_segments(record: &AnnotationRecord, bucket: Bucket) -> String {
    let mut out = String::new();
    for row in schema::bucket_fields(bucket) {
        if let Some(value) = record.tier(row.tier) {
            push_segment(&mut out, row.field, value);
        }
    }
    out
}

/// Segments for tiers outside the schema; empty values are dropped
fn overflow_segments(record: &AnnotationRecord) -> String {
    let mut out = String::new();
    for (tier, value) in record.tiers() {
        if schema::lookup(tier).is_none() && !value.is_empty() {
            push_segment(&mut out, tier, value);
        }
    }
    out
}

fn push_segment(out: &mut String, field: &str, value: &str) {
    // Writing to a String cannot fail
    let _ = write!(out, "|{field}={value}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TimeWindow;
    use pretty_assertions::assert_eq;

    // 2007-03-07 19:00:00 UTC
    const BASE: i64 = 1_173_294_000;

    fn record(start: u64, end: u64) -> AnnotationRecord {
        AnnotationRecord::new(TimeWindow::new(start, end), "GES_03", "Speech", "hello")
    }

    #[test]
    fn speaker_and_speech_line() {
        let rec = record(1000, 4000).with_tier("Speaker", "A");
        let out = RecordFormatter::new(BASE).format(&rec).unwrap();

        assert_eq!(
            out.text(),
            "20070307190001.000|20070307190004.000|GES_03|Speaker=A|Speech=hello\n"
        );
        assert_eq!(out.sort_key().to_string(), "20070307190001.000");
    }

    #[test]
    fn three_lines_in_fixed_order() {
        let rec = record(1500, 2250)
            .with_tier("Arms & hands", "wave")
            .with_tier("Notes", "loud")
            .with_tier("Rectangle", "10,10,50,50")
            .with_tier("Gesture", "point")
            .with_tier("Circle", "5,5,3");
        let out = RecordFormatter::new(BASE).format(&rec).unwrap();

        let prefix = "20070307190001.500|20070307190002.250|GES_03";
        assert_eq!(
            out.text(),
            format!(
                "{prefix}|BoundingBox=10,10,50,50|Speech=hello\n\
                 {prefix}|Gesture=point|BoundingCircle=5,5,3|Arms & Hands=wave\n\
                 {prefix}|Notes=loud\n"
            )
        );
    }

    #[test]
    fn known_empty_values_are_written() {
        let rec = AnnotationRecord::new(TimeWindow::new(0, 10), "GES_03", "Speech", "");
        let out = RecordFormatter::new(BASE).format(&rec).unwrap();
        assert!(out.text().ends_with("|GES_03|Speech=\n"));
    }

    #[test]
    fn unknown_empty_values_are_dropped() {
        let rec = AnnotationRecord::new(TimeWindow::new(0, 10), "GES_03", "Notes", "");
        let out = RecordFormatter::new(BASE).format(&rec).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn formatting_is_repeatable() {
        let rec = record(1000, 4000).with_tier("Extra", "x").with_tier("Head", "nod");
        let formatter = RecordFormatter::new(BASE);
        assert_eq!(formatter.format(&rec).unwrap(), formatter.format(&rec).unwrap());
    }

    #[test]
    fn format_all_sorts_and_skips_empty() {
        let records = vec![
            record(5000, 6000),
            AnnotationRecord::new(TimeWindow::new(100, 200), "GES_03", "Notes", ""),
            record(1000, 2000),
        ];
        let out = RecordFormatter::new(BASE).format_all(&records).unwrap();

        let keys: Vec<_> = out.iter().map(|r| r.sort_key().to_string()).collect();
        assert_eq!(keys, vec!["20070307190001.000", "20070307190005.000"]);
    }
}
