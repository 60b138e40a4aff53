//! HTTP page fetcher
//!
//! This module handles every outbound request of a run:
//! - Building the shared HTTP client with browser-like headers and a timeout
//! - Issuing a single GET per source page (no retries, no backoff)
//! - Classifying the outcome as a body or a [`FetchError`]

use crate::config::FetcherConfig;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Capability to retrieve a page body by URL
///
/// Implementations must not retry; one call is one attempt.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use data_sentry::config::FetcherConfig;
/// use data_sentry::pipeline::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared reqwest client
///
/// The client is acquired when the fetcher is built and released when it is
/// dropped, which happens on every exit path of the run that owns it.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_page(&self.client, url).await
    }
}

/// Fetches a single page
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Ok(body)` |
/// | Any other status | `BadStatus(code)` |
/// | Timeout (connect or read) | `Timeout` |
/// | Connection, TLS, body decode failure | `Transport(message)` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Absolute URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(classify_error)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::BadStatus(status.as_u16()));
    }

    response.text().await.map_err(classify_error)
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(error.to_string())
    }
}
