use crate::config::types::{Config, HarvestConfig, OutputConfig, ViewerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_viewer_config(&config.viewer)?;
    validate_harvest_config(&config.harvest)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates viewer configuration
fn validate_viewer_config(config: &ViewerConfig) -> Result<(), ConfigError> {
    // The document identifier is appended directly to the base URL, so the
    // base URL must already be a URL-with-open-query once something follows it.
    let probe = format!("{}X", config.base_url);
    let url = Url::parse(&probe)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if url.query().is_none() {
        return Err(ConfigError::Validation(format!(
            "base-url must end in an open query parameter for the document id \
             (e.g. 'https://books.google.com/books?id='), got '{}'",
            config.base_url
        )));
    }

    if config.locale.is_empty()
        || !config
            .locale
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "locale must be a language tag such as 'en' or 'pt-BR', got '{}'",
            config.locale
        )));
    }

    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-secs must be >= 1, got {}",
            config.navigation_timeout_secs
        )));
    }

    Ok(())
}

/// Validates harvest configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if config.stall_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "stall-limit must be >= 1, got {}",
            config.stall_limit
        )));
    }

    if config.advance_delay_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "advance-delay-ms must be >= 10ms, got {}ms",
            config.advance_delay_ms
        )));
    }

    if config.download_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "download-timeout-secs must be >= 1, got {}",
            config.download_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
