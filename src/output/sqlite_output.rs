//! SQLite-based record sink
//!
//! Every run becomes one row in `runs` plus one row per record in `listings`,
//! written in a single transaction.

use crate::output::schema::initialize_schema;
use crate::output::traits::{OutputResult, RecordSink, SinkReceipt};
use crate::pipeline::{ListingRecord, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// A listing as stored in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredListing {
    pub source: String,
    pub title: String,
    pub url: String,
    pub score: String,
    pub scraped_at: String,
}

/// Record sink backed by a SQLite database
pub struct SqliteSink {
    conn: Connection,
    path: Option<PathBuf>,
    run_started: NaiveDateTime,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path`
    ///
    /// Parent directories are created when missing.
    pub fn new(path: &Path, run_started: NaiveDateTime) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            run_started,
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory(run_started: NaiveDateTime) -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            run_started,
        })
    }

    /// Returns the listings of a run in their original order
    pub fn listings_for_run(&self, run_id: i64) -> OutputResult<Vec<StoredListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, title, url, score, scraped_at FROM listings
             WHERE run_id = ?1 ORDER BY position",
        )?;

        let listings = stmt
            .query_map(params![run_id], |row| {
                Ok(StoredListing {
                    source: row.get(0)?,
                    title: row.get(1)?,
                    url: row.get(2)?,
                    score: row.get(3)?,
                    scraped_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    /// Counts the runs stored so far
    pub fn count_runs(&self) -> OutputResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count)
    }

    fn insert_run(&self, records: &[ListingRecord]) -> OutputResult<i64> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO runs (started_at, record_count) VALUES (?1, ?2)",
            params![
                self.run_started.format(TIMESTAMP_FORMAT).to_string(),
                records.len() as i64
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO listings (run_id, position, source, title, url, score, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for (position, record) in records.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    record.source(),
                    record.title(),
                    record.url(),
                    record.score(),
                    record.scraped_at_string(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }
}

impl RecordSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write(&self, records: &[ListingRecord]) -> OutputResult<SinkReceipt> {
        let run_id = self.insert_run(records)?;

        let database = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());

        tracing::info!(%database, run_id, rows = records.len(), "Saved data to SQLite");

        Ok(SinkReceipt {
            location: format!("{} (run {})", database, run_id),
            rows: records.len(),
        })
    }
}
