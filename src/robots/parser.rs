//! Robots.txt parser implementation
//!
//! Only `Disallow:` directives are read. `Allow:`, `Crawl-delay:` and
//! user-agent grouping are ignored: every disallow line in the file applies
//! to this crawler.

use url::Url;

/// Disallowed path prefixes for one domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    /// Path prefixes in file order
    disallowed: Vec<String>,
}

impl RobotsRules {
    /// Parses robots.txt content
    ///
    /// Empty `Disallow:` values never restrict anything. `Disallow: /` is
    /// only kept when `strict` is set; otherwise it is treated as no
    /// restriction.
    ///
    /// # Example
    ///
    /// ```
    /// use koala_search::robots::RobotsRules;
    ///
    /// let rules = RobotsRules::parse("User-agent: *\nDisallow: /admin\nDisallow: /", false);
    /// assert_eq!(rules.disallowed(), ["/admin"]);
    /// ```
    pub fn parse(content: &str, strict: bool) -> Self {
        let mut disallowed = Vec::new();

        for line in content.lines() {
            // Drop trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            if !key.trim().eq_ignore_ascii_case("disallow") {
                continue;
            }

            let value = value.trim();
            if value.is_empty() || (value == "/" && !strict) {
                continue;
            }

            if !disallowed.iter().any(|existing| existing == value) {
                disallowed.push(value.to_string());
            }
        }

        Self { disallowed }
    }

    /// A rule set that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns the disallowed path prefixes in file order
    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    /// Checks a path (optionally with query) against the disallow prefixes
    pub fn is_path_allowed(&self, path: &str) -> bool {
        !self
            .disallowed
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Checks a URL against the disallow prefixes
    pub fn is_allowed(&self, url: &Url) -> bool {
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.is_path_allowed(&target)
    }
}
