//! Data Sentry: a trending-listings scraper
//!
//! This crate fetches the front pages of a fixed set of content sources
//! (Hacker News, Product Hunt, Reddit), extracts listing records from their
//! markup, and merges them into a single ordered record set that output sinks
//! persist as tabular data.

pub mod config;
pub mod output;
pub mod pipeline;

use thiserror::Error;

/// Main error type for Data Sentry operations
///
/// Fetch and extraction failures never surface here; they are absorbed by the
/// aggregator and reported through logs and job reports.
#[derive(Debug, Error)]
pub enum SentryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Outcome of a failed page fetch
///
/// Every variant is recoverable: the job that hit it contributes no records
/// and the rest of the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with something other than 200 OK
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),

    /// No complete response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or body decoding failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type alias for Data Sentry operations
pub type Result<T> = std::result::Result<T, SentryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{scrape_all, Aggregator, ListingRecord, SourceJob};
