//! Timestamped CSV output
//!
//! One file per run, named after the run start time so successive runs never
//! overwrite each other. Columns are fixed: `source,title,url,score,scraped_at`.

use crate::output::traits::{OutputResult, RecordSink, SinkReceipt};
use crate::pipeline::ListingRecord;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column order of every CSV file
pub const CSV_HEADER: [&str; 5] = ["source", "title", "url", "score", "scraped_at"];

/// Writes records to `<dir>/scraped_data_<YYYYmmdd_HHMMSS>.csv`
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    run_started: NaiveDateTime,
}

impl CsvSink {
    /// Creates a sink for a run that started at `run_started`
    ///
    /// The directory is created on first write if it does not exist.
    pub fn new(dir: impl Into<PathBuf>, run_started: NaiveDateTime) -> Self {
        Self {
            dir: dir.into(),
            run_started,
        }
    }

    /// Full path of the file this sink writes
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(csv_file_name(self.run_started))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, records: &[ListingRecord]) -> OutputResult<SinkReceipt> {
        fs::create_dir_all(&self.dir)?;

        let path = self.file_path();
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(format_csv(records).as_bytes())?;
        writer.flush()?;

        tracing::info!(path = %path.display(), rows = records.len(), "Saved data to CSV");

        Ok(SinkReceipt {
            location: path.display().to_string(),
            rows: records.len(),
        })
    }
}

/// `scraped_data_20240501_093000.csv`
pub fn csv_file_name(run_started: NaiveDateTime) -> String {
    format!("scraped_data_{}.csv", run_started.format("%Y%m%d_%H%M%S"))
}

/// Renders records as CSV text with a header row and no index column
pub fn format_csv(records: &[ListingRecord]) -> String {
    let mut csv = String::new();
    push_row(&mut csv, &CSV_HEADER);

    for record in records {
        let scraped_at = record.scraped_at_string();
        push_row(
            &mut csv,
            &[
                record.source(),
                record.title(),
                record.url(),
                record.score(),
                &scraped_at,
            ],
        );
    }

    csv
}

fn push_row(csv: &mut String, fields: &[&str]) {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
    csv.push_str(&line.join(","));
    csv.push('\n');
}

/// Quotes a field containing a delimiter, quote or line break; quotes are doubled
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
