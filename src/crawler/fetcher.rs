//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests with redirects followed by the client
//! - Classifying responses into content, rejections and network failures

use crate::config::UserAgentConfig;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML
    UnsupportedContent {
        /// The Content-Type received, empty if none was sent
        content_type: String,
    },

    /// Non-2xx response
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Timeout, connection failure or unreadable body
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use koala_search::config::UserAgentConfig;
/// use koala_search::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "KoalaSearch".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header names an HTML document
pub fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML Content-Type | `Success` |
/// | 2xx with any other Content-Type | `UnsupportedContent` |
/// | Non-2xx after redirects | `HttpError` |
/// | Timeout, connect error, body read error | `NetworkError` |
///
/// Nothing is retried; a failed task simply ends.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return FetchResult::UnsupportedContent { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
