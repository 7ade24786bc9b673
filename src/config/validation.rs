use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, SearchConfig, SiteEntry, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links_per_page must be >= 1, got {}",
            config.max_links_per_page
        )));
    }

    if config.fingerprint_prefix_chars < 1 {
        return Err(ConfigError::Validation(format!(
            "fingerprint_prefix_chars must be >= 1, got {}",
            config.fingerprint_prefix_chars
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates retrieval configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.snippet_window < 1 {
        return Err(ConfigError::Validation(
            "snippet_window must be >= 1".to_string(),
        ));
    }

    if config.oversample < 1 {
        return Err(ConfigError::Validation(
            "oversample must be >= 1".to_string(),
        ));
    }

    if config.default_per_page < 1 || config.default_per_page > config.max_per_page {
        return Err(ConfigError::Validation(format!(
            "default_per_page must be between 1 and max_per_page ({}), got {}",
            config.max_per_page, config.default_per_page
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.index_cache_path.is_empty() {
        return Err(ConfigError::Validation(
            "index_cache_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates site entries
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for site in sites {
        if site.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Site '{}' must have a name",
                site.url
            )));
        }

        let url = Url::parse(&site.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid site URL '{}': {}", site.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Site URL '{}' must use HTTP or HTTPS",
                site.url
            )));
        }

        if site.max_pages == Some(0) {
            return Err(ConfigError::Validation(format!(
                "Site '{}' max_pages override must be >= 1",
                site.name
            )));
        }

        if !seen.insert(url.as_str().to_string()) {
            return Err(ConfigError::Validation(format!(
                "Site URL '{}' is listed more than once",
                site.url
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str) -> SiteEntry {
        SiteEntry {
            url: url.to_string(),
            name: "Site".to_string(),
            max_pages: None,
            max_depth: None,
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }

    #[test]
    fn test_validate_sites() {
        assert!(validate_sites(&[site("https://example.com/"), site("http://other.org/")]).is_ok());

        assert!(validate_sites(&[site("ftp://example.com/")]).is_err());
        assert!(validate_sites(&[site("not a url")]).is_err());
        assert!(validate_sites(&[site("https://example.com/"), site("https://example.com/")]).is_err());

        let mut unnamed = site("https://example.com/");
        unnamed.name = "  ".to_string();
        assert!(validate_sites(&[unnamed]).is_err());

        let mut zero_budget = site("https://example.com/");
        zero_budget.max_pages = Some(0);
        assert!(validate_sites(&[zero_budget]).is_err());
    }

    #[test]
    fn test_validate_crawler_config() {
        assert!(validate_crawler_config(&CrawlerConfig::default()).is_ok());

        let mut config = CrawlerConfig::default();
        config.max_links_per_page = 0;
        assert!(validate_crawler_config(&config).is_err());

        let mut config = CrawlerConfig::default();
        config.request_timeout_secs = 0;
        assert!(validate_crawler_config(&config).is_err());

        // A zero delay is allowed; politeness is the operator's call
        let mut config = CrawlerConfig::default();
        config.request_delay_ms = 0;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_validate_search_config() {
        assert!(validate_search_config(&SearchConfig::default()).is_ok());

        let mut config = SearchConfig::default();
        config.default_per_page = config.max_per_page + 1;
        assert!(validate_search_config(&config).is_err());

        let mut config = SearchConfig::default();
        config.snippet_window = 0;
        assert!(validate_search_config(&config).is_err());
    }
}
