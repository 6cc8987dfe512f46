//! Typed error hierarchy for floorwatch.
//!
//! Two top-level enums cover the two fallible subsystems:
//! - `DataError`: reading and parsing the factory dataset
//! - `BotError`: calls to a remote answer provider
//!
//! Neither reaches an HTTP client directly: data errors collapse to an empty
//! table and bot errors fall back to the keyword responder.

use thiserror::Error;

/// Errors from loading the factory dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("No data path configured")]
    NoPath,

    #[error("Failed to open data file at {path}: {source}")]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row {row} in {path}: {source}")]
    Row {
        path: std::path::PathBuf,
        row: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read CSV header in {path}: {source}")]
    Header {
        path: std::path::PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors from a remote answer provider.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Answer provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Answer provider returned status {status}")]
    Status { status: u16 },

    #[error("Answer provider timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Answer provider returned an empty answer")]
    EmptyAnswer,
}
