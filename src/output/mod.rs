//! Output module for persisting and reporting scrape results
//!
//! This module handles:
//! - Writing each run to a timestamped CSV file
//! - Optionally recording runs in a SQLite database
//! - Printing a console summary of the run

mod csv;
mod schema;
mod sqlite_output;
mod summary;
mod traits;

pub use self::csv::{csv_file_name, format_csv, CsvSink, CSV_HEADER};
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite_output::{SqliteSink, StoredListing};
pub use summary::{format_summary, print_summary};
pub use traits::{OutputError, OutputResult, RecordSink, SinkReceipt};

use crate::config::OutputConfig;
use crate::pipeline::ListingRecord;
use chrono::NaiveDateTime;
use std::path::Path;

/// Opens every sink the output configuration asks for
///
/// The CSV sink is always present; the SQLite sink only when a database path
/// is configured.
pub fn open_sinks(
    config: &OutputConfig,
    run_started: NaiveDateTime,
) -> OutputResult<Vec<Box<dyn RecordSink>>> {
    let mut sinks: Vec<Box<dyn RecordSink>> =
        vec![Box::new(CsvSink::new(&config.data_dir, run_started))];

    if let Some(database_path) = &config.database_path {
        sinks.push(Box::new(SqliteSink::new(
            Path::new(database_path),
            run_started,
        )?));
    }

    Ok(sinks)
}

/// Hands the records to every sink, in order
pub fn write_all(
    sinks: &[Box<dyn RecordSink>],
    records: &[ListingRecord],
) -> OutputResult<Vec<SinkReceipt>> {
    sinks.iter().map(|sink| sink.write(records)).collect()
}
