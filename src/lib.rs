//! # cinrad
//!
//! Decoding and Cartesian resampling of CINRAD weather-radar volume scans.
//!
//! Volume files from the supported vendor formats (the CMA standard format,
//! its phased-array variant, CINRAD/SA-SB and CINRAD/CC) are decoded into a
//! uniform polar [`RadarVolume`], which can then be read as named arrays or
//! resampled onto grids and cross-sections.
//!
//! ## Architecture
//!
//! - **Codec**: fixed-size header records over a bounds-checked byte cursor
//! - **Readers**: per-format state machines behind a sniffing dispatcher
//! - **Records**: per-product polar volumes with nearest-neighbour lookup
//! - **Resampling**: PPI, CAPPI, composite, 3-D grids and vertical sections

pub mod codec;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod product;
pub mod reader;
pub mod record;
pub mod resample;
pub mod transform;
pub mod volume;

pub use config::Config;
pub use dataset::{AttributeValue, Dimension, Metadata, Variable};
pub use error::{RadarError, Result};
pub use logging::{
    init_tracing, log_decode_stats, log_error, log_operation_end, log_operation_start,
    log_timed_operation,
};
pub use reader::{read_bytes, read_file, sniff, RadarFormat, ReaderOptions, SiteOverride};
pub use record::{CodeTransform, RadialRecord, RawGates, Scan};
pub use volume::{RadarVolume, SiteInfo, TaskInfo, VolumeDimensions};
