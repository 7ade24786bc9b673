//! The corpus record produced by a crawl and consumed by the index

use crate::crawler::{fingerprint, PageMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully crawled page
///
/// Created once per accepted page and never mutated afterwards; a recrawl
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub content: String,
    #[serde(default)]
    pub word_count: usize,
    /// Hex SHA-256 of the leading content characters
    #[serde(default)]
    pub content_fingerprint: String,
    #[serde(default = "Utc::now")]
    pub crawled_at: DateTime<Utc>,
}

impl Document {
    /// Builds a document from extracted page content
    pub fn new(
        url: impl Into<String>,
        metadata: PageMetadata,
        content: impl Into<String>,
        prefix_chars: usize,
    ) -> Self {
        let content = content.into();
        Self {
            url: url.into(),
            title: metadata.title.unwrap_or_default(),
            description: metadata.description.unwrap_or_default(),
            keywords: metadata.keywords,
            word_count: count_words(&content),
            content_fingerprint: fingerprint(&content, prefix_chars),
            content,
            crawled_at: Utc::now(),
        }
    }

    /// Migrates a legacy `(url, text)` corpus pair
    pub fn from_legacy(url: impl Into<String>, text: impl Into<String>, prefix_chars: usize) -> Self {
        Self::new(url, PageMetadata::default(), text, prefix_chars)
    }

    /// Recomputes the derived fields from `content`
    ///
    /// Applied to imported records so the word count and fingerprint always
    /// agree with the content they describe.
    pub fn with_derived_fields(mut self, prefix_chars: usize) -> Self {
        self.word_count = count_words(&self.content);
        self.content_fingerprint = fingerprint(&self.content, prefix_chars);
        self
    }

    /// Text handed to the vectorizer: title followed by content
    pub fn index_text(&self) -> String {
        if self.title.is_empty() {
            self.content.clone()
        } else {
            format!("{} {}", self.title, self.content)
        }
    }
}

/// Counts whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
