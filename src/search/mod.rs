//! Search module
//!
//! # Components
//!
//! - `SearchEngine`: ranked, filtered, paginated retrieval over a published index
//! - `extract_snippet`: query-context excerpts
//! - `expand_query`: synonym expansion
//! - `SearchStats`: totals, recent history and popular queries

mod engine;
mod query;
mod snippet;
mod stats;

pub use engine::{SearchEngine, SearchParams, SearchResult, SortBy};
pub use query::expand_query;
pub use snippet::{extract_snippet, ELLIPSIS};
pub use stats::{SearchLog, SearchStats, StatsSummary};

use crate::index::IndexError;
use thiserror::Error;

/// Errors returned to search callers
///
/// No partial results accompany an error.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Search index is not ready; crawl and index some sites first")]
    NotReady,

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}
