//! Storage traits and error types
//!
//! This module defines the trait interface for corpus storage backends and
//! associated error types.

use crate::document::Document;
use crate::search::SearchLog;
use crate::storage::{DomainCount, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid corpus record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for corpus storage backends
///
/// The corpus is an ordered list of documents keyed by URL; load order is
/// first-insertion order and survives upserts.
pub trait CorpusStore {
    // ===== Run Management =====

    /// Records the start of a site crawl and returns the run ID
    fn create_run(&mut self, seed_url: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run completed with its accepted document count
    fn complete_run(&mut self, run_id: i64, accepted: usize) -> StorageResult<()>;

    /// Marks a run failed
    fn fail_run(&mut self, run_id: i64, message: &str) -> StorageResult<()>;

    // ===== Documents =====

    /// Inserts a document or replaces the one with the same URL
    fn save_document(&mut self, document: &Document, run_id: Option<i64>) -> StorageResult<()>;

    /// Saves many documents in one transaction; returns the number written
    fn save_documents(&mut self, documents: &[Document], run_id: Option<i64>)
        -> StorageResult<usize>;

    /// Replaces the corpus slice under `site_prefix` with a fresh crawl
    ///
    /// Stored documents whose URL starts with the prefix and that are absent
    /// from `documents` are deleted; the rest are upserted. Runs in one
    /// transaction. Returns the number of documents written.
    fn replace_site_documents(
        &mut self,
        site_prefix: &str,
        documents: &[Document],
        run_id: Option<i64>,
    ) -> StorageResult<usize>;

    /// Loads the whole corpus in first-insertion order
    fn load_documents(&self) -> StorageResult<Vec<Document>>;

    /// Gets a document by URL
    fn get_document(&self, url: &str) -> StorageResult<Option<Document>>;

    // ===== Search History =====

    /// Appends one executed search
    fn record_search(&mut self, log: &SearchLog) -> StorageResult<()>;

    /// Number of recorded searches
    fn total_searches(&self) -> StorageResult<u64>;

    /// Most frequent lowercased queries, count descending then query ascending
    fn popular_queries(&self, limit: usize) -> StorageResult<Vec<(String, u64)>>;

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64>;

    /// Sum of word counts over the corpus
    fn total_words(&self) -> StorageResult<u64>;

    /// Document counts per domain, largest first
    fn documents_by_domain(&self) -> StorageResult<Vec<DomainCount>>;
}
