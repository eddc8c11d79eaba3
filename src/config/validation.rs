use crate::config::types::{Config, CrawlerConfig, FetchConfig, FocusedConfig, RenderConfig};
use crate::ConfigError;

/// Upper bound on concurrent workers
const MAX_WORKERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_focused_config(&config.focused)?;
    validate_render_config(&config.render)?;
    Ok(())
}

/// Validates crawler configuration
///
/// The seed URL is checked when the crawl is constructed, not here.
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    for pattern in &config.rendered_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch timeouts must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

fn validate_focused_config(config: &FocusedConfig) -> Result<(), ConfigError> {
    if config.max_seen_links < 1 {
        return Err(ConfigError::Validation(format!(
            "max-seen-links must be >= 1, got {}",
            config.max_seen_links
        )));
    }

    if config.max_known_links < 1 {
        return Err(ConfigError::Validation(format!(
            "max-known-links must be >= 1, got {}",
            config.max_known_links
        )));
    }

    Ok(())
}

fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "render timeout-secs must be at least 1 second".to_string(),
        ));
    }

    if config.settle_ms >= config.timeout_secs.saturating_mul(1000) {
        return Err(ConfigError::Validation(format!(
            "settle-ms ({}) must be shorter than the render timeout ({}s)",
            config.settle_ms, config.timeout_secs
        )));
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(
            "window dimensions must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
    validate_domain_string(domain)
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    if domain.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must be lowercase",
            domain
        )));
    }

    Ok(())
}
