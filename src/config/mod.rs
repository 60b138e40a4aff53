//! Configuration module for Data Sentry
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Without a file, [`Config::default`] describes the built-in run over Hacker News,
//! Product Hunt, r/technology and r/programming.
//!
//! # Example
//!
//! ```no_run
//! use data_sentry::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sentry.toml")).unwrap();
//! println!("Request timeout: {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, FetcherConfig, OutputConfig, SourceConfig, SourceKind, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
