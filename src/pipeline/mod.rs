//! Fetch-extract-aggregate pipeline
//!
//! This module contains the core scraping logic, including:
//! - HTTP page fetching with a single attempt per source
//! - Per-site listing extraction from HTML
//! - Concurrent execution of source jobs and ordered aggregation

mod aggregator;
pub mod extract;
mod fetcher;
mod job;
#[cfg(test)]
mod log_capture;
mod record;

pub use aggregator::{Aggregator, JobReport, ScrapeReport, SourceSummary};
pub use extract::{
    dedupe_by_url, extract_records, Extraction, ExtractionOutcome, Extractor, SkipReason,
};
pub use fetcher::{build_http_client, fetch_page, HttpFetcher, PageFetcher};
pub use job::SourceJob;
pub use record::{Clock, FixedClock, ListingRecord, SystemClock, TIMESTAMP_FORMAT};

use crate::config::Config;
use crate::SentryError;

/// Runs one complete scrape over the configured sources
///
/// This is the main entry point for a run. It will:
/// 1. Build the source jobs from configuration
/// 2. Acquire the shared HTTP client
/// 3. Fetch and extract every source concurrently
/// 4. Release the client and return the ordered records
///
/// Fetch and extraction failures are absorbed into the report; only
/// configuration and client construction errors are returned.
///
/// # Example
///
/// ```no_run
/// use data_sentry::config::Config;
/// use data_sentry::pipeline::scrape_all;
///
/// # async fn run() -> Result<(), data_sentry::SentryError> {
/// let report = scrape_all(&Config::default()).await?;
/// println!("Scraped {} items", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape_all(config: &Config) -> Result<ScrapeReport, SentryError> {
    let jobs = SourceJob::from_sources(&config.sources)?;

    // The client lives exactly as long as this aggregator.
    let aggregator = Aggregator::new(HttpFetcher::from_config(&config.fetcher)?);
    Ok(aggregator.run_report(&jobs).await)
}
