use crate::url::DomainMatch;
use serde::Deserialize;

/// Main configuration structure for Koala Search
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of accepted documents per crawl run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Delay between processed tasks (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-fetch timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Pages with fewer words than this are rejected
    #[serde(rename = "min-word-count")]
    pub min_word_count: usize,

    /// Maximum number of new links enqueued from a single page
    #[serde(rename = "max-links-per-page")]
    pub max_links_per_page: usize,

    /// Number of leading content characters hashed into the fingerprint
    #[serde(rename = "fingerprint-prefix-chars")]
    pub fingerprint_prefix_chars: usize,

    /// How discovered hosts are compared against the seed host
    #[serde(rename = "domain-match")]
    pub domain_match: DomainMatch,

    /// Honor `Disallow: /` in robots.txt
    #[serde(rename = "strict-robots")]
    pub strict_robots: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_depth: 2,
            request_delay_ms: 1000,
            request_timeout_secs: 10,
            min_word_count: 20,
            max_links_per_page: 10,
            fingerprint_prefix_chars: 500,
            domain_match: DomainMatch::Substring,
            strict_robots: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Snippet window size in characters
    #[serde(rename = "snippet-window")]
    pub snippet_window: usize,

    /// Results per page when the caller does not say
    #[serde(rename = "default-per-page")]
    pub default_per_page: usize,

    /// Upper bound on results per page
    #[serde(rename = "max-per-page")]
    pub max_per_page: usize,

    /// Candidate oversampling factor applied before filtering
    pub oversample: usize,

    /// Apply synonym expansion by default
    #[serde(rename = "expand-query")]
    pub expand_query: bool,

    /// Number of recent searches kept in statistics
    #[serde(rename = "recent-searches")]
    pub recent_searches: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            snippet_window: 200,
            default_per_page: 10,
            max_per_page: 50,
            oversample: 2,
            expand_query: true,
            recent_searches: 100,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite corpus database
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the cached index snapshot
    #[serde(rename = "index-cache-path")]
    pub index_cache_path: String,
}

/// A website to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Seed URL the crawl starts from
    pub url: String,

    /// Human-readable site name
    pub name: String,

    /// Overrides `crawler.max-pages` for this site
    #[serde(default, rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Overrides `crawler.max-depth` for this site
    #[serde(default, rename = "max-depth")]
    pub max_depth: Option<u32>,
}

impl SiteEntry {
    /// Returns the crawler configuration with this site's overrides applied
    pub fn crawler_config(&self, base: &CrawlerConfig) -> CrawlerConfig {
        let mut config = base.clone();
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        config
    }
}
