use crate::config::types::{Config, FetchConfig, ListingConfig, OutputConfig, SelectorConfig};
use crate::url::build_page_url;
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_listing_config(&config.listing)?;
    validate_fetch_config(&config.fetch)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing configuration
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    // page_count == 0 is a legitimate empty run

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    build_page_url(&config.url_template, 0)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.url_template, e)))?;

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.max_in_flight < 1 || config.max_in_flight > 100 {
        return Err(ConfigError::Validation(format!(
            "max_in_flight must be between 1 and 100, got {}",
            config.max_in_flight
        )));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (key, selector) in config.entries() {
        if selector.trim().is_empty() {
            return Err(ConfigError::InvalidSelector(format!(
                "{} selector cannot be empty",
                key
            )));
        }

        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} selector '{}': {}", key, selector, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    let blank = config
        .json_path
        .to_str()
        .map_or(false, |path| path.trim().is_empty());
    if config.json_path.as_os_str().is_empty() || blank {
        return Err(ConfigError::Validation(
            "json_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
