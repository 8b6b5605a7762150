//! Error types for the calendar store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Malformed calendar document {}: {source}", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No unsaved changes for year {0}")]
    NoDraft(i32),

    #[error("Year {0} not found")]
    YearNotFound(i32),

    /// The in-memory change was kept but its draft could not be written.
    #[error("Change to year {year} applied but not persisted: {source}")]
    PersistFailed {
        year: i32,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Store is read-only (edit mode disabled)")]
    ReadOnly,

    #[error("No calendar data found in {}", .0.display())]
    NoCalendarData(PathBuf),

    /// A multi-year commit or revert that did not finish for every year.
    #[error("{} year(s) failed after completing {:?}", failures.len(), completed)]
    Batch {
        completed: Vec<i32>,
        failures: Vec<(i32, StoreError)>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
