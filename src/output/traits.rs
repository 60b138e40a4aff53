//! Record sink trait and output error types

use crate::pipeline::ListingRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Where a sink put the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReceipt {
    /// Human-readable location (file path, database path and run id)
    pub location: String,

    /// Number of records written
    pub rows: usize,
}

/// Persists an aggregated record sequence
///
/// Sinks receive the complete, ordered output of a run and must keep that
/// order.
pub trait RecordSink {
    /// Short name used in logs, e.g. "csv"
    fn name(&self) -> &'static str;

    /// Writes all records of a run
    fn write(&self, records: &[ListingRecord]) -> OutputResult<SinkReceipt>;
}
