use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use koala_search::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the host with an explicit non-default port, e.g. `127.0.0.1:8080`
///
/// Used as the per-domain key for robots rules so that two servers on the
/// same host but different ports keep separate policies.
pub fn authority(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Strips a leading `www.` label
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
