//! Error types for Farm Ledger

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A ledger source could not be read. Aborts the whole computation.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid time window: end {end} is before start {start}")]
    InvalidTimeWindow { start: i64, end: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Wrap any storage-layer failure as `StorageUnavailable`
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
