use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for the worker pool size
pub const MAX_WORKERS_LIMIT: u32 = 50;

/// Smallest accepted delay before a fetch, in seconds
pub const MIN_REQUEST_DELAY: f64 = 0.3;

/// Largest accepted delay before a fetch, in seconds
pub const MAX_REQUEST_DELAY: f64 = 3600.0;

/// Normalizes user input into a seed URL string
///
/// Surrounding whitespace is dropped and `https://` is prepended when the
/// input carries no `http://` or `https://` scheme.
///
/// # Examples
///
/// ```
/// use sitescribe::config::normalize_seed_url;
///
/// assert_eq!(normalize_seed_url("example.com"), "https://example.com");
/// assert_eq!(normalize_seed_url(" http://example.com/a "), "http://example.com/a");
/// ```
pub fn normalize_seed_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Parses the configured seed URL, requiring an HTTP(S) scheme and a host
pub fn seed_url(config: &Config) -> Result<Url, ConfigError> {
    let raw = &config.crawler.seed_url;
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            raw
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            raw
        ))),
    }
}

/// Normalizes the seed URL in place and validates the whole configuration
///
/// After this returns `Ok`, the configuration is treated as frozen for the
/// duration of a crawl.
pub fn prepare(config: &mut Config) -> Result<(), ConfigError> {
    if !config.crawler.seed_url.trim().is_empty() {
        config.crawler.seed_url = normalize_seed_url(&config.crawler.seed_url);
    }
    validate(config)
}

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    seed_url(config)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed_url is required".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    if !config.request_delay.is_finite()
        || config.request_delay < MIN_REQUEST_DELAY
        || config.request_delay > MAX_REQUEST_DELAY
    {
        return Err(ConfigError::Validation(format!(
            "request_delay must be between {}s and {}s, got {}s",
            MIN_REQUEST_DELAY, MAX_REQUEST_DELAY, config.request_delay
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
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

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("pages_file", &config.pages_file),
        ("links_file", &config.links_file),
        ("errors_file", &config.errors_file),
        ("deduplicated_file", &config.deduplicated_file),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.pages_file == config.deduplicated_file {
        return Err(ConfigError::Validation(
            "deduplicated_file must differ from pages_file".to_string(),
        ));
    }

    Ok(())
}
