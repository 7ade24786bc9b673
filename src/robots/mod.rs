//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt disallow rules. Fetching is fail-open: any failure yields an
//! empty rule list.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::RobotsRules;

use reqwest::{Client, StatusCode};
use url::Url;

/// Fetches robots.txt for the domain of `url`
///
/// Issues one request to `{scheme}://{domain}/robots.txt`. A network error,
/// a non-200 status, or an unreadable body all produce an empty rule list.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Any URL on the domain
/// * `strict` - Whether `Disallow: /` is honored
pub async fn fetch_robots(client: &Client, url: &Url, strict: bool) -> RobotsRules {
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", url, e);
            return RobotsRules::allow_all();
        }
    };

    tracing::debug!("Fetching {}", robots_url);

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("robots.txt fetch failed for {}: {}", robots_url, e);
            return RobotsRules::allow_all();
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return RobotsRules::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            let rules = RobotsRules::parse(&body, strict);
            tracing::debug!(
                "robots.txt at {}: {} disallow rules",
                robots_url,
                rules.disallowed().len()
            );
            rules
        }
        Err(e) => {
            tracing::warn!("robots.txt body unreadable at {}: {}", robots_url, e);
            RobotsRules::allow_all()
        }
    }
}
