//! Source jobs: one fetch target paired with its extractor and item cap

use crate::config::{SourceConfig, SourceKind};
use crate::pipeline::extract::{Extractor, HackerNews, ProductHunt, Reddit};
use crate::ConfigError;
use std::fmt;
use url::Url;

/// One unit of concurrent work for the aggregator
///
/// Jobs are built once at the start of a run and only read afterwards.
pub struct SourceJob {
    extractor: Box<dyn Extractor>,
    url: String,
    cap: usize,
}

impl SourceJob {
    /// Creates a job that fetches the extractor's own target page
    pub fn new(extractor: Box<dyn Extractor>, cap: usize) -> Self {
        let url = extractor.target_url();
        Self {
            extractor,
            url,
            cap,
        }
    }

    /// Builds a job from a `[[source]]` configuration entry
    pub fn from_config(source: &SourceConfig) -> Result<Self, ConfigError> {
        let base_url = source.effective_base_url();
        let origin = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e))
        })?;

        let extractor: Box<dyn Extractor> = match source.kind {
            SourceKind::HackerNews => Box::new(HackerNews::new(origin)),
            SourceKind::ProductHunt => Box::new(ProductHunt::new(origin)),
            SourceKind::Reddit => {
                let subreddit = source.subreddit.as_deref().ok_or_else(|| {
                    ConfigError::Validation("reddit sources require a subreddit".to_string())
                })?;
                Box::new(Reddit::new(origin, subreddit))
            }
        };

        Ok(Self::new(extractor, source.effective_cap()))
    }

    /// Builds the jobs of a run, preserving configuration order
    pub fn from_sources(sources: &[SourceConfig]) -> Result<Vec<Self>, ConfigError> {
        sources.iter().map(Self::from_config).collect()
    }

    pub fn extractor(&self) -> &dyn Extractor {
        self.extractor.as_ref()
    }

    pub fn source_name(&self) -> &str {
        self.extractor.source_name()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl fmt::Debug for SourceJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceJob")
            .field("source", &self.source_name())
            .field("url", &self.url)
            .field("cap", &self.cap)
            .finish()
    }
}
