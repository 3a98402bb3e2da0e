//! Error types for watermark-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for watermark-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading benchmark data or writing reports.
///
/// Malformed measurements inside an otherwise readable dataset are not errors:
/// the scoring code skips them and logs why.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The top-level JSON value has a layout that holds no model records.
    #[error("Unsupported dataset layout: {0}")]
    DatasetFormat(String),

    /// A dataset file or directory could not be used.
    #[error("Dataset load failed: {path}: {reason}")]
    DatasetLoad {
        /// Path that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// A configured PSNR normalization range is empty or inverted.
    #[error("Invalid PSNR range: min {min} must be below max {max}")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Error writing report files.
    #[error("Report error: {0}")]
    Report(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
