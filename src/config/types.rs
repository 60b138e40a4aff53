use serde::Deserialize;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like identifier; the sources reject stock client user agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Main configuration structure for Data Sentry
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives the timestamped CSV files
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Optional SQLite database that also receives every run
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

/// The kind of site a source scrapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    HackerNews,
    ProductHunt,
    Reddit,
}

impl SourceKind {
    /// Number of items taken from the first page when no cap is configured
    pub fn default_cap(self) -> usize {
        match self {
            SourceKind::HackerNews => 30,
            SourceKind::ProductHunt => 20,
            SourceKind::Reddit => 25,
        }
    }

    /// Canonical origin of the site
    pub fn default_base_url(self) -> &'static str {
        match self {
            SourceKind::HackerNews => "https://news.ycombinator.com",
            SourceKind::ProductHunt => "https://www.producthunt.com",
            SourceKind::Reddit => "https://old.reddit.com",
        }
    }
}

/// One `[[source]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,

    /// Subreddit name, required for `reddit` sources only
    #[serde(default)]
    pub subreddit: Option<String>,

    /// Maximum number of candidate items read from the page
    #[serde(default)]
    pub cap: Option<usize>,

    /// Origin override (used against mirrors and mock servers)
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,
}

impl SourceConfig {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            subreddit: None,
            cap: None,
            base_url: None,
        }
    }

    pub fn reddit(subreddit: &str) -> Self {
        Self {
            subreddit: Some(subreddit.to_string()),
            ..Self::new(SourceKind::Reddit)
        }
    }

    /// Configured cap, falling back to the kind's default
    pub fn effective_cap(&self) -> usize {
        self.cap.unwrap_or_else(|| self.kind.default_cap())
    }

    /// Configured origin, falling back to the kind's canonical one
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
    }
}

impl Default for Config {
    /// The built-in run: Hacker News, Product Hunt, r/technology, r/programming
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            output: OutputConfig::default(),
            sources: vec![
                SourceConfig::new(SourceKind::HackerNews),
                SourceConfig::new(SourceKind::ProductHunt),
                SourceConfig::reddit("technology"),
                SourceConfig::reddit("programming"),
            ],
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_path: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}
