//! Koala Search: a polite site crawler with ranked corpus search
//!
//! This crate crawls configured websites under depth, page and politeness
//! budgets, extracts and deduplicates page content, and serves ranked search
//! over the accumulated corpus with paginated, snippet-annotated results.

pub mod config;
pub mod crawler;
pub mod document;
pub mod index;
pub mod output;
pub mod robots;
pub mod search;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Koala Search operations
#[derive(Debug, Error)]
pub enum KoalaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Index error: {0}")]
    Index(#[from] index::IndexError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons a discovered link is not admitted to the frontier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Non-navigational link: {0}")]
    NonNavigational(String),

    #[error("Non-document resource: {0}")]
    NonDocument(String),

    #[error("Out of crawl scope: {0}")]
    OutOfScope(String),
}

/// Result type alias for Koala Search operations
pub type Result<T> = std::result::Result<T, KoalaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, Crawler};
pub use document::Document;
pub use search::{SearchEngine, SearchParams, SearchResult, SortBy};
pub use state::{TaskError, TaskState};
pub use url::{normalize_link, DomainMatch, DomainScope};
