//! Error types for the cinrad crate.
//!
//! Decode-time failures abort the whole read; resampling never produces an
//! error and reports misses as NaN instead.

use thiserror::Error;

/// The main error type for cinrad operations.
#[derive(Error, Debug)]
pub enum RadarError {
    /// The leading bytes did not match any decoder
    #[error("Unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// The file declares a scan mode or encoding the decoders cannot handle
    #[error("Unsupported scan mode: {message}")]
    UnsupportedScanMode { message: String },

    /// The stream ended inside a header or radial
    #[error(
        "Truncated record: {record} at byte {offset} needs {needed} bytes, {available} available"
    )]
    TruncatedRecord {
        record: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A product was requested that the volume does not contain
    #[error("Missing product: {product}")]
    MissingProduct { product: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RadarError {
    pub(crate) fn scan_mode(message: impl Into<String>) -> Self {
        RadarError::UnsupportedScanMode {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with RadarError
pub type Result<T> = std::result::Result<T, RadarError>;
