//! `eaf2seg` driver
//!
//! Ties the conversion core to the filesystem:
//! - **naming**: clip offset, recording start and staging paths from file names
//! - **staging**: lookup of the base log in the dated staging tree
//! - **driver**: one `ConversionJob` from annotation file to merged log
//!
//! # Example
//!
//! ```rust,ignore
//! use seg_cli::{convert, ConversionJob, DriverConfig};
//!
//! let job = ConversionJob::new(
//!     "Montel_Williams_Show_797-1277.eaf",
//!     "out/2007-03-07_1900_US_KTTV-FOX_Montel_Williams_Show.seg",
//! )
//! .with_config(DriverConfig::new().with_staging(false));
//! let summary = convert(&job)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod driver;
pub mod error;
pub mod naming;
pub mod staging;

pub use config::{DriverConfig, DEFAULT_STAGING_ROOT};
pub use driver::{convert, run, ConversionJob, ConversionSummary};
pub use error::DriverError;
pub use naming::{
    clip_offset_secs, default_graph_path, recording_start_epoch_secs, staged_log_path,
};
pub use staging::locate_staged_log;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
