//! Statistics generation from the corpus database
//!
//! This module provides functionality for extracting and displaying
//! corpus statistics from the storage layer.

use crate::storage::{CorpusStore, DomainCount, RunRecord, StorageResult};

/// Number of popular queries shown in the report
const POPULAR_QUERY_LIMIT: usize = 10;

/// Corpus statistics summary
#[derive(Debug, Clone)]
pub struct CorpusStatistics {
    /// Number of stored documents
    pub documents: u64,

    /// Sum of document word counts
    pub total_words: u64,

    /// Document counts per domain, largest first
    pub by_domain: Vec<DomainCount>,

    /// Most recent crawl run, if any
    pub latest_run: Option<RunRecord>,

    /// Searches recorded by the CLI
    pub total_searches: u64,

    /// Most frequent queries with their counts
    pub popular_queries: Vec<(String, u64)>,
}

impl CorpusStatistics {
    /// Mean words per document, 0 for an empty corpus
    pub fn average_words(&self) -> f64 {
        if self.documents == 0 {
            0.0
        } else {
            self.total_words as f64 / self.documents as f64
        }
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn CorpusStore) -> StorageResult<CorpusStatistics> {
    Ok(CorpusStatistics {
        documents: storage.count_documents()?,
        total_words: storage.total_words()?,
        by_domain: storage.documents_by_domain()?,
        latest_run: storage.get_latest_run()?,
        total_searches: storage.total_searches()?,
        popular_queries: storage.popular_queries(POPULAR_QUERY_LIMIT)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CorpusStatistics) {
    println!("=== Corpus Statistics ===\n");

    println!("Overview:");
    println!("  Documents: {}", stats.documents);
    println!("  Total words: {}", stats.total_words);
    println!("  Average words per document: {:.1}", stats.average_words());
    println!();

    if !stats.by_domain.is_empty() {
        println!("Documents by Domain:");
        for entry in &stats.by_domain {
            let percentage = (entry.documents as f64 / stats.documents.max(1) as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", entry.domain, entry.documents, percentage);
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  #{} {} [{}]", run.id, run.seed_url, run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Accepted documents: {}", run.accepted);
            if let Some(message) = &run.error_message {
                println!("  Error: {}", message);
            }
        }
        None => println!("No crawl runs recorded yet."),
    }

    println!();
    println!("Searches: {}", stats.total_searches);
    if !stats.popular_queries.is_empty() {
        println!("Popular Queries:");
        for (query, count) in &stats.popular_queries {
            println!("  {}: {}", query, count);
        }
    }
}
