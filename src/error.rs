//! Error types for the rating pipeline.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for rating operations
pub type Result<T> = std::result::Result<T, EloError>;

/// Errors that can occur while reading matches or writing features.
///
/// The rating engine itself never fails; every variant here belongs to the
/// stream boundary, the writers or configuration.
#[derive(Error, Debug)]
pub enum EloError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed contest record
    #[error("Invalid contest record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Match dates went backwards
    #[error("Matches out of chronological order at row {row}: {current} follows {previous}")]
    OutOfOrder {
        row: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// Input header lacks a required column
    #[error("Missing required column '{column}' in input header")]
    MissingColumn { column: String },

    /// Rejected rating configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}
