//! Annotation → `.seg` conversion core
//!
//! The three stages of a conversion run, leaves first:
//! - **Aggregation**: graph nodes → per-time-window `AnnotationRecord`s
//! - **Formatting**: each record → fixed-layout `.seg` lines plus a sort key
//! - **Merging**: formatted records interleaved into an existing
//!   chronological log, behind a one-time credit header
//!
//! # Architecture
//!
//! ```text
//! AnnotationGraph → Aggregator → [AnnotationRecord] → RecordFormatter → [FormattedRecord]
//!                                                                            ↓
//!                               original .seg ───────────────────────→ LogMerger → merged .seg
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use seg_core::prelude::*;
//!
//! let config = ConversionConfig::new();
//! let records = aggregate(&graph, &config)?;
//! let formatted = RecordFormatter::new(video_start_secs).format_all(&records)?;
//! let header = CreditHeader::new(&config, author, chrono::Utc::now());
//! merge_log_file("2007-03-07_1900_US_KTTV-FOX.seg", &formatted, &header.render())?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod aggregator;
pub mod config;
pub mod credit;
pub mod error;
pub mod formatter;
pub mod merger;
pub mod record;
pub mod schema;
pub mod timestamp;

pub use aggregator::{aggregate, Aggregator};
pub use config::ConversionConfig;
pub use credit::{author_from_file, extract_author, CreditHeader};
pub use error::{AggregateError, ConfigError, MergeError, TimestampError};
pub use formatter::{FormattedRecord, RecordFormatter};
pub use merger::{
    merge_log_file, merge_log_into, merge_stream, LineKind, LogMerger, MergeReport, MergeState,
};
pub use record::{AnnotationRecord, TimeWindow};
pub use timestamp::SegTimestamp;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a conversion
    pub use crate::{
        aggregate, merge_log_file, merge_stream, AnnotationRecord, ConversionConfig,
        CreditHeader, FormattedRecord, MergeReport, RecordFormatter, SegTimestamp,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
