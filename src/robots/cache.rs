//! Per-run robots.txt cache
//!
//! Rules are fetched at most once per domain for the lifetime of a crawl run
//! and never refreshed mid-run, even when several tasks touch a new domain at
//! the same time.

use crate::robots::{fetch_robots, RobotsRules};
use crate::url::authority;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use url::Url;

type Slot = Arc<OnceCell<Arc<RobotsRules>>>;

/// Domain → robots rules, scoped to one crawl run
#[derive(Debug, Default)]
pub struct RobotsCache {
    strict: bool,
    slots: Mutex<HashMap<String, Slot>>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// `strict` is forwarded to the parser and decides whether `Disallow: /`
    /// is honored.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the rules for the URL's domain, fetching them on first touch
    ///
    /// URLs without a host get the allow-all policy.
    pub async fn rules_for(&self, client: &Client, url: &Url) -> Arc<RobotsRules> {
        let Some(key) = authority(url) else {
            return Arc::new(RobotsRules::allow_all());
        };

        // Hold the map lock only long enough to find or create the slot; the
        // fetch itself runs under the slot's OnceCell.
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key).or_default().clone()
        };

        slot.get_or_init(|| async {
            Arc::new(fetch_robots(client, url, self.strict).await)
        })
        .await
        .clone()
    }

    /// Checks whether a URL may be fetched
    pub async fn is_allowed(&self, client: &Client, url: &Url) -> bool {
        self.rules_for(client, url).await.is_allowed(url)
    }

    /// Number of domains whose rules have been resolved
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    /// Returns true if no domain has been resolved yet
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_url_without_host_allows_all() {
        let cache = RobotsCache::new(true);
        let client = Client::new();
        let url = Url::parse("data:text/plain,hello").unwrap();

        let rules = cache.rules_for(&client, &url).await;
        assert!(rules.disallowed().is_empty());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_unreachable_domain_cached_as_allow_all() {
        let cache = RobotsCache::new(false);
        let client = Client::new();
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let url = Url::parse("http://127.0.0.1:9/page").unwrap();

        assert!(cache.is_allowed(&client, &url).await);
        assert_eq!(cache.len().await, 1);

        // Second touch reuses the cached slot
        assert!(cache.is_allowed(&client, &url).await);
        assert_eq!(cache.len().await, 1);
    }
}
