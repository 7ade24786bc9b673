//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with response classification
//! - HTML parsing and link discovery
//! - Content extraction and near-duplicate rejection
//! - The frontier and the crawl loop itself

mod coordinator;
mod dedup;
mod extractor;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlOutcome, Crawler};
pub use dedup::{fingerprint, DedupIndex};
pub use extractor::{extract_content, normalize_text, ExtractedContent, PageMetadata};
pub use fetcher::{build_http_client, fetch_url, is_html, FetchResult};
pub use frontier::{CrawlTask, Frontier, VisitedSet};
pub use parser::{analyze_page, extract_hrefs, AnalyzedPage};
