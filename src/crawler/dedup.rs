//! Content fingerprinting and near-duplicate rejection
//!
//! The fingerprint covers only a fixed-length prefix of the normalized text,
//! so templated pages that differ only in long trailing sections collapse to
//! the same fingerprint.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Hex SHA-256 of the first `prefix_chars` characters of `content`
pub fn fingerprint(content: &str, prefix_chars: usize) -> String {
    let end = content
        .char_indices()
        .nth(prefix_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(content.len());

    let mut hasher = Sha256::new();
    hasher.update(content[..end].as_bytes());
    hex::encode(hasher.finalize())
}

/// Set of fingerprints accepted so far in a crawl run
///
/// Grows monotonically; never shrinks.
#[derive(Debug, Clone)]
pub struct DedupIndex {
    prefix_chars: usize,
    seen: HashSet<String>,
}

impl DedupIndex {
    /// Creates an empty index hashing `prefix_chars` leading characters
    pub fn new(prefix_chars: usize) -> Self {
        Self {
            prefix_chars,
            seen: HashSet::new(),
        }
    }

    /// Fingerprint of `content` under this index's prefix length
    pub fn fingerprint(&self, content: &str) -> String {
        fingerprint(content, self.prefix_chars)
    }

    /// Returns true if content with the same prefix was already registered
    pub fn is_duplicate(&self, content: &str) -> bool {
        self.seen.contains(&self.fingerprint(content))
    }

    /// Registers content and returns its fingerprint
    pub fn register(&mut self, content: &str) -> String {
        let fp = self.fingerprint(content);
        self.seen.insert(fp.clone());
        fp
    }

    /// Checks and registers in one step
    ///
    /// Returns the new fingerprint, or `None` if the content is a duplicate.
    /// Callers that may run concurrently must use this rather than
    /// `is_duplicate` followed by `register`.
    pub fn check_and_register(&mut self, content: &str) -> Option<String> {
        let fp = self.fingerprint(content);
        if self.seen.insert(fp.clone()) {
            Some(fp)
        } else {
            None
        }
    }

    /// Number of registered fingerprints
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
