//! Dataset error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the sightings dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The CSV file could not be opened or read
    #[error("Failed to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row is missing or unreadable
    #[error("Invalid dataset header: {0}")]
    Header(String),

    /// A data row could not be parsed into a record
    #[error("Line {line}: {message}")]
    Row { line: u64, message: String },

    /// Latitude or longitude outside the valid range
    #[error("Line {line}: coordinate out of range (lat={latitude}, lon={longitude})")]
    InvalidCoordinate {
        line: u64,
        latitude: f64,
        longitude: f64,
    },
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
