//! URL handling module for Koala Search
//!
//! This module provides link normalization and validation, domain extraction,
//! and the crawl scope policy that decides which hosts a crawl may follow
//! links into.

mod domain;
mod normalize;

use serde::Deserialize;
use url::Url;

// Re-export main functions
pub use domain::{authority, extract_domain, strip_www};
pub use normalize::{canonicalize_seed, normalize_link};

/// How discovered hosts are compared against the seed host
///
/// A leading `www.` is ignored on both sides in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainMatch {
    /// Host must equal the seed host
    Exact,
    /// Host must equal the seed host or be one of its subdomains
    Subdomain,
    /// Host must contain the seed host as a substring
    #[default]
    Substring,
}

/// The set of hosts a crawl run may enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    seed_host: String,
    mode: DomainMatch,
}

impl DomainScope {
    /// Creates a scope around the given seed host
    pub fn new(seed_host: &str, mode: DomainMatch) -> Self {
        let lowered = seed_host.to_lowercase();
        Self {
            seed_host: strip_www(&lowered).to_string(),
            mode,
        }
    }

    /// Creates a scope around the host of a seed URL
    pub fn from_seed(seed: &Url, mode: DomainMatch) -> crate::UrlResult<Self> {
        let host = extract_domain(seed).ok_or(crate::UrlError::MissingDomain)?;
        Ok(Self::new(&host, mode))
    }

    /// Returns the seed host this scope was built from
    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    /// Checks whether a host is inside the scope
    pub fn contains_host(&self, host: &str) -> bool {
        let lowered = host.to_lowercase();
        let host = strip_www(&lowered);

        match self.mode {
            DomainMatch::Exact => host == self.seed_host,
            DomainMatch::Subdomain => host
                .strip_suffix(self.seed_host.as_str())
                .map_or(false, |prefix| prefix.is_empty() || prefix.ends_with('.')),
            DomainMatch::Substring => host.contains(self.seed_host.as_str()),
        }
    }

    /// Checks whether a URL's host is inside the scope
    pub fn contains(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| self.contains_host(host))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_scope() {
        let scope = DomainScope::new("www.Example.com", DomainMatch::Exact);
        assert_eq!(scope.seed_host(), "example.com");
        assert!(scope.contains_host("example.com"));
        assert!(scope.contains_host("WWW.example.com"));
        assert!(!scope.contains_host("blog.example.com"));
        assert!(!scope.contains_host("example.org"));
    }

    #[test]
    fn test_subdomain_scope() {
        let scope = DomainScope::new("example.com", DomainMatch::Subdomain);
        assert!(scope.contains_host("example.com"));
        assert!(scope.contains_host("blog.example.com"));
        assert!(!scope.contains_host("notexample.com"));
    }

    #[test]
    fn test_substring_scope() {
        let scope = DomainScope::new("example.com", DomainMatch::Substring);
        assert!(scope.contains_host("blog.example.com"));
        assert!(scope.contains_host("example.com.mirror.net"));
        assert!(!scope.contains_host("example.org"));
    }

    #[test]
    fn test_scope_from_seed() {
        let seed = Url::parse("https://www.realpython.com/start").unwrap();
        let scope = DomainScope::from_seed(&seed, DomainMatch::Exact).unwrap();
        assert_eq!(scope.seed_host(), "realpython.com");
        assert!(scope.contains(&Url::parse("https://realpython.com/a").unwrap()));
    }
}
