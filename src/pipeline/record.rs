//! Listing records and the clock that stamps them

use chrono::{Local, NaiveDateTime, Timelike};

/// Timestamp format for `scraped_at`, precise to the second
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One scraped item
///
/// Fields are private so a record cannot change after construction; the
/// extractors are the only producers and they uphold the invariants
/// (non-empty trimmed title, absolute http(s) url, non-empty source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    source: String,
    title: String,
    url: String,
    score: String,
    scraped_at: NaiveDateTime,
}

impl ListingRecord {
    pub(crate) fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        score: impl Into<String>,
        scraped_at: NaiveDateTime,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            score: score.into(),
            scraped_at,
        }
    }

    /// Origin identifier, e.g. "Hacker News" or "Reddit r/technology"
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opaque score text: a number, "0", or "N/A"
    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn scraped_at(&self) -> NaiveDateTime {
        self.scraped_at
    }

    /// `scraped_at` rendered as `YYYY-MM-DDTHH:MM:SS`
    pub fn scraped_at_string(&self) -> String {
        self.scraped_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
