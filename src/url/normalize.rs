use crate::url::DomainScope;
use crate::UrlError;
use url::Url;

/// Link prefixes that never lead to a crawlable document
const NON_NAVIGATIONAL_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Path extensions for binary, media, archive, style and script resources
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    // documents and data
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "csv", "json", "xml", "rss",
    // images
    "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "bmp", "tif", "tiff",
    // audio and video
    "mp3", "mp4", "wav", "ogg", "avi", "mov", "mkv", "webm", "flac",
    // archives and binaries
    "zip", "tar", "gz", "tgz", "bz2", "rar", "7z", "exe", "dmg", "msi", "apk", "iso", "bin",
    // styles, scripts and fonts
    "css", "js", "mjs", "map", "woff", "woff2", "ttf", "otf", "eot",
];

/// Canonicalizes a discovered link and decides whether it is crawlable
///
/// # Normalization Steps
///
/// 1. Reject empty links, non-navigational schemes (`javascript:`, `mailto:`,
///    `tel:`, `data:`) and fragment-only links (`#section`)
/// 2. Resolve the link against the URL of the page it was found on
/// 3. Reject anything that is not HTTP(S) or has no host
/// 4. Remove the fragment; path and query are kept, default ports are dropped
/// 5. Reject paths ending in a non-document extension
/// 6. Reject hosts outside the crawl scope
///
/// Pure function of its inputs.
///
/// # Examples
///
/// ```
/// use koala_search::url::{normalize_link, DomainMatch, DomainScope};
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let scope = DomainScope::new("example.com", DomainMatch::Exact);
///
/// let url = normalize_link("intro?lang=en#top", &base, &scope).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/intro?lang=en");
///
/// assert!(normalize_link("https://other.org/", &base, &scope).is_err());
/// ```
pub fn normalize_link(raw: &str, base: &Url, scope: &DomainScope) -> Result<Url, UrlError> {
    let link = raw.trim();

    if link.is_empty() {
        return Err(UrlError::Parse("empty link".to_string()));
    }

    let lowered = link.to_ascii_lowercase();
    if link.starts_with('#')
        || NON_NAVIGATIONAL_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
    {
        return Err(UrlError::NonNavigational(link.to_string()));
    }

    let mut url = base
        .join(link)
        .map_err(|e| UrlError::Parse(format!("{}: {}", link, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    if has_non_document_extension(&url) {
        return Err(UrlError::NonDocument(url.to_string()));
    }

    if !scope.contains(&url) {
        return Err(UrlError::OutOfScope(url.to_string()));
    }

    Ok(url)
}

/// Parses a seed URL into canonical form without applying scope rules
pub fn canonicalize_seed(seed: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

fn has_non_document_extension(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, ext)) => NON_DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
