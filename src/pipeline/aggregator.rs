//! Fan-out/fan-in over source jobs
//!
//! The aggregator starts every job's fetch+extract pipeline at once, waits for
//! all of them, and concatenates their records in job submission order. A job
//! whose fetch fails contributes nothing; its siblings are unaffected.

use crate::pipeline::extract::extract_records;
use crate::pipeline::fetcher::PageFetcher;
use crate::pipeline::job::SourceJob;
use crate::pipeline::record::{Clock, ListingRecord, SystemClock};
use crate::FetchError;
use futures::future::join_all;
use std::sync::Arc;

/// What one job produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub source: String,
    pub url: String,
    pub records: Vec<ListingRecord>,
    /// Candidate items that were skipped during extraction
    pub skipped: usize,
    /// Set when the page could not be fetched
    pub error: Option<FetchError>,
}

/// Per-source line of a run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub source: String,
    pub url: String,
    pub records: usize,
    pub skipped: usize,
    pub error: Option<FetchError>,
}

/// Combined result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// All records, grouped by source in job order
    pub records: Vec<ListingRecord>,
    pub sources: Vec<SourceSummary>,
}

impl ScrapeReport {
    /// Flattens job reports, keeping submission order
    pub fn from_reports(reports: Vec<JobReport>) -> Self {
        let mut report = ScrapeReport::default();

        for job in reports {
            report.sources.push(SourceSummary {
                source: job.source,
                url: job.url,
                records: job.records.len(),
                skipped: job.skipped,
                error: job.error,
            });
            report.records.extend(job.records);
        }

        tracing::info!(total = report.records.len(), "Total items scraped");
        report
    }

    /// True when no job yielded a single record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of jobs whose fetch failed
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Runs source jobs concurrently over a shared fetcher
pub struct Aggregator<F> {
    fetcher: F,
    clock: Arc<dyn Clock>,
}

impl<F: PageFetcher> Aggregator<F> {
    /// Creates an aggregator stamping records with the local clock
    pub fn new(fetcher: F) -> Self {
        Self::with_clock(fetcher, Arc::new(SystemClock))
    }

    pub fn with_clock(fetcher: F, clock: Arc<dyn Clock>) -> Self {
        Self { fetcher, clock }
    }

    /// Runs all jobs and returns their records in submission order
    pub async fn run(&self, jobs: &[SourceJob]) -> Vec<ListingRecord> {
        self.run_report(jobs).await.records
    }

    /// Runs all jobs and returns the flattened records with per-source counts
    pub async fn run_report(&self, jobs: &[SourceJob]) -> ScrapeReport {
        ScrapeReport::from_reports(self.run_detailed(jobs).await)
    }

    /// Runs all jobs and returns one report per job, in submission order
    ///
    /// Completion order does not matter: results are joined positionally.
    pub async fn run_detailed(&self, jobs: &[SourceJob]) -> Vec<JobReport> {
        tracing::info!(jobs = jobs.len(), "Starting scraping all sources");
        join_all(jobs.iter().map(|job| self.run_job(job))).await
    }

    async fn run_job(&self, job: &SourceJob) -> JobReport {
        tracing::info!(source = job.source_name(), url = job.url(), "Scraping source");

        let mut report = JobReport {
            source: job.source_name().to_string(),
            url: job.url().to_string(),
            records: Vec::new(),
            skipped: 0,
            error: None,
        };

        let body = match self.fetcher.fetch(job.url()).await {
            Ok(body) => body,
            Err(error) => {
                tracing::error!(url = job.url(), error = %error, "Failed to fetch page");
                report.error = Some(error);
                return report;
            }
        };

        let extraction = extract_records(job.extractor(), &body, job.cap(), self.clock.as_ref());
        tracing::info!(
            source = job.source_name(),
            count = extraction.records.len(),
            skipped = extraction.skipped,
            "Extracted listings"
        );

        report.records = extraction.records;
        report.skipped = extraction.skipped;
        report
    }
}
