use crate::config::types::{Config, FetcherConfig, OutputConfig, SourceConfig, SourceKind};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.database_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the `[[source]]` entries
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source must be configured".to_string(),
        ));
    }

    for source in sources {
        validate_source(source)?;
    }

    Ok(())
}

fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    if let Some(cap) = source.cap {
        if cap < 1 || cap > 100 {
            return Err(ConfigError::Validation(format!(
                "cap must be between 1 and 100, got {} for {:?}",
                cap, source.kind
            )));
        }
    }

    match (source.kind, source.subreddit.as_deref()) {
        (SourceKind::Reddit, None) => {
            return Err(ConfigError::Validation(
                "reddit sources require a subreddit".to_string(),
            ));
        }
        (SourceKind::Reddit, Some(name)) => validate_subreddit(name)?,
        (kind, Some(_)) => {
            return Err(ConfigError::Validation(format!(
                "subreddit is only valid for reddit sources, found on {:?}",
                kind
            )));
        }
        (_, None) => {}
    }

    if let Some(base_url) = &source.base_url {
        let url = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "base_url '{}' must use http or https",
                base_url
            )));
        }
    }

    Ok(())
}

/// Subreddit names are ASCII alphanumerics and underscores
fn validate_subreddit(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "invalid subreddit name '{}'",
            name
        )));
    }

    Ok(())
}
