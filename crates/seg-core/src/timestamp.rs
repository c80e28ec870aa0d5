//! `.seg` timestamps
//!
//! Every data line in a `.seg` log starts with an 18-character UTC
//! timestamp `YYYYMMDDHHMMSS.mmm`. Internally a timestamp is whole epoch
//! milliseconds, which doubles as the merge sort key.

use crate::error::TimestampError;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Length of the leading timestamp field of a data line
pub const TIMESTAMP_LEN: usize = 18;

const MILLIS_SEPARATOR_AT: usize = 14;

/// A UTC instant at millisecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegTimestamp {
    epoch_ms: i64,
}

impl SegTimestamp {
    /// From epoch milliseconds
    ///
    /// # Errors
    /// `TimestampError::OutOfRange` if the instant cannot be represented
    /// as a calendar time.
    pub fn from_epoch_millis(epoch_ms: i64) -> Result<Self, TimestampError> {
        DateTime::<Utc>::from_timestamp_millis(epoch_ms)
            .map(|_| Self { epoch_ms })
            .ok_or_else(|| TimestampError::OutOfRange(epoch_ms.to_string()))
    }

    /// The instant `offset_ms` after `base_epoch_secs`
    ///
    /// Seconds and the millisecond remainder are carried separately, so a
    /// clip-relative offset of 1500 ms lands on `<base + 1 s>.500`.
    ///
    /// # Errors
    /// `TimestampError::OutOfRange` on overflow.
    pub fn at_offset(base_epoch_secs: i64, offset_ms: u64) -> Result<Self, TimestampError> {
        let out_of_range =
            || TimestampError::OutOfRange(format!("{base_epoch_secs}s + {offset_ms}ms"));
        let offset = i64::try_from(offset_ms).map_err(|_| out_of_range())?;
        base_epoch_secs
            .checked_mul(1000)
            .and_then(|base| base.checked_add(offset))
            .ok_or_else(out_of_range)
            .and_then(Self::from_epoch_millis)
    }

    /// Parse a `YYYYMMDDHHMMSS.mmm` field
    ///
    /// # Errors
    /// - `TimestampError::InvalidFormat` on wrong length or non-digits
    /// - `TimestampError::OutOfRange` for impossible dates (e.g. month 13)
    pub fn parse(field: &str) -> Result<Self, TimestampError> {
        let invalid = || TimestampError::InvalidFormat(field.to_string());
        let bytes = field.as_bytes();
        if bytes.len() != TIMESTAMP_LEN || bytes[MILLIS_SEPARATOR_AT] != b'.' {
            return Err(invalid());
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == MILLIS_SEPARATOR_AT || b.is_ascii_digit());
        if !digits_ok {
            return Err(invalid());
        }

        // All ASCII digits from here, so slicing by byte offsets is safe
        let num = |range: std::ops::Range<usize>| -> Result<u32, TimestampError> {
            field[range].parse().map_err(|_| invalid())
        };
        let year = i32::try_from(num(0..4)?).map_err(|_| invalid())?;
        let (month, day) = (num(4..6)?, num(6..8)?);
        let (hour, minute, second) = (num(8..10)?, num(10..12)?, num(12..14)?);
        let milli = num(15..18)?;

        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, minute, second, milli))
            .ok_or_else(|| TimestampError::OutOfRange(field.to_string()))?;

        Ok(Self {
            epoch_ms: naive.and_utc().timestamp_millis(),
        })
    }

    /// Epoch milliseconds
    #[inline]
    #[must_use]
    pub fn epoch_millis(self) -> i64 {
        self.epoch_ms
    }
}

impl fmt::Display for SegTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Constructors reject unrepresentable instants
        let dt = DateTime::<Utc>::from_timestamp_millis(self.epoch_ms).ok_or(fmt::Error)?;
        write!(
            f,
            "{}.{:03}",
            dt.format("%Y%m%d%H%M%S"),
            dt.timestamp_subsec_millis()
        )
    }
}

impl std::str::FromStr for SegTimestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2007-03-07 19:00:00 UTC
    const BASE: i64 = 1_173_294_000;

    #[test]
    fn offset_splits_seconds_and_millis() {
        let ts = SegTimestamp::at_offset(BASE, 1500).unwrap();
        assert_eq!(ts.to_string(), "20070307190001.500");
    }

    #[test]
    fn whole_second_offset_pads_millis() {
        let ts = SegTimestamp::at_offset(BASE, 4000).unwrap();
        assert_eq!(ts.to_string(), "20070307190004.000");
    }

    #[test]
    fn parse_matches_display() {
        let ts = SegTimestamp::parse("20070307190005.042").unwrap();
        assert_eq!(ts.epoch_millis(), BASE * 1000 + 5042);
        assert_eq!(ts.to_string(), "20070307190005.042");
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        assert!(matches!(
            SegTimestamp::parse("2007030719000.0000"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert!(matches!(
            SegTimestamp::parse("2007030719000x.000"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert!(SegTimestamp::parse("20070307190005").is_err());
    }

    #[test]
    fn parse_rejects_impossible_date() {
        assert!(matches!(
            SegTimestamp::parse("20071307190005.000"),
            Err(TimestampError::OutOfRange(_))
        ));
    }

    #[test]
    fn ordering_follows_time() {
        let a = SegTimestamp::parse("20070307190001.000").unwrap();
        let b = SegTimestamp::parse("20070307190001.001").unwrap();
        assert!(a < b);
        assert_eq!(b.epoch_millis() - a.epoch_millis(), 1);
    }
}
