//! HTML parsing for link discovery
//!
//! This module pulls candidate links out of a page and runs the whole
//! synchronous half of page processing in one place, so the parsed
//! document never has to live across an `.await`.

use crate::crawler::extractor::{extract_content, ExtractedContent};
use crate::url::{normalize_link, DomainScope};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Everything the crawl loop needs from one fetched page
#[derive(Debug, Clone)]
pub struct AnalyzedPage {
    /// Normalized text and head metadata
    pub extracted: ExtractedContent,

    /// In-scope, normalized links in document order, without repeats
    pub links: Vec<Url>,
}

/// Parses a page body, extracts its content and discovers its links
///
/// Links are resolved against `page_url` and filtered through
/// [`normalize_link`]; anything it rejects is silently skipped.
///
/// # Example
///
/// ```
/// use koala_search::crawler::analyze_page;
/// use koala_search::url::{DomainMatch, DomainScope};
/// use url::Url;
///
/// let page_url = Url::parse("https://example.com/docs/").unwrap();
/// let scope = DomainScope::from_seed(&page_url, DomainMatch::Exact).unwrap();
/// let html = r#"<html><head><title>Docs</title></head>
///     <body><a href="intro#top">Intro</a><a href="https://other.org/">Away</a></body></html>"#;
///
/// let page = analyze_page(html, &page_url, &scope);
/// assert_eq!(page.extracted.metadata.title.as_deref(), Some("Docs"));
/// assert_eq!(page.links.len(), 1);
/// assert_eq!(page.links[0].as_str(), "https://example.com/docs/intro");
/// ```
pub fn analyze_page(body: &str, page_url: &Url, scope: &DomainScope) -> AnalyzedPage {
    let document = Html::parse_document(body);
    let extracted = extract_content(&document);

    let mut seen = HashSet::new();
    let links = extract_hrefs(&document)
        .into_iter()
        .filter_map(|href| normalize_link(&href, page_url, scope).ok())
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect();

    AnalyzedPage { extracted, links }
}

/// Returns the raw `href` values of followable anchors, in document order
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `<link>`, `<script src>`, `<img src>` and other non-anchor references
///
/// `rel="nofollow"` anchors are still returned.
pub fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}
