//! Retrieval engine
//!
//! A `SearchEngine` is the context object for querying: it owns the
//! published index reference, the retrieval settings and the search
//! statistics. Queries only ever see a fully built index, because a new
//! index is swapped in as a whole by [`SearchEngine::publish`].

use crate::config::SearchConfig;
use crate::index::{IndexEntry, TfIdfVectorizer, VectorIndex, Vectorizer};
use crate::search::query::expand_query;
use crate::search::snippet::extract_snippet;
use crate::search::stats::SearchStats;
use crate::search::SearchError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

/// Result ordering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Descending score, most relevant first
    #[default]
    Score,
    /// Ascending score
    Relevance,
}

impl FromStr for SortBy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "relevance" => Ok(Self::Relevance),
            other => Err(SearchError::InvalidQuery(format!(
                "unknown sort mode '{}', expected 'score' or 'relevance'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score => f.write_str("score"),
            Self::Relevance => f.write_str("relevance"),
        }
    }
}

/// Per-query options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Multiplier on `per_page` for the raw candidate count
    pub top_k: usize,
    pub sort_by: SortBy,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    /// Keep only results whose URL contains this substring
    pub domain: Option<String>,
    /// Synonym expansion; `None` uses the configured default
    pub expand: Option<bool>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            sort_by: SortBy::Score,
            page: 1,
            per_page: 10,
            domain: None,
            expand: None,
        }
    }
}

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub score: f32,
    pub snippet: String,
}

/// Query context over a published index
pub struct SearchEngine<V = TfIdfVectorizer> {
    index: RwLock<Option<Arc<VectorIndex<V>>>>,
    config: SearchConfig,
    stats: Mutex<SearchStats>,
}

impl<V: Vectorizer> SearchEngine<V> {
    /// Creates an engine with no index published yet
    pub fn new(config: SearchConfig) -> Self {
        let stats = SearchStats::new(config.recent_searches);
        Self {
            index: RwLock::new(None),
            config,
            stats: Mutex::new(stats),
        }
    }

    /// Atomically replaces the index queries run against
    ///
    /// Searches already in flight finish on the index they started with.
    pub fn publish(&self, index: VectorIndex<V>) {
        let documents = index.len();
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(index));
        tracing::info!("Published index of {} documents", documents);
    }

    /// Returns true when a non-empty index is published
    pub fn is_ready(&self) -> bool {
        self.current_index().is_some_and(|index| !index.is_empty())
    }

    /// The currently published index
    pub fn current_index(&self) -> Option<Arc<VectorIndex<V>>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Snapshot of the search statistics
    pub fn stats(&self) -> SearchStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs a ranked, filtered, paginated search
    ///
    /// # Steps
    ///
    /// 1. Validate the query and paging values
    /// 2. Optionally expand the query with synonyms
    /// 3. Fetch `max(top_k * per_page * oversample, page * per_page)` raw
    ///    candidates from the index
    /// 4. Keep candidates whose URL contains the domain filter
    /// 5. Sort by score, descending for [`SortBy::Score`] and ascending for
    ///    [`SortBy::Relevance`]; equal scores order by URL
    /// 6. Slice out the requested page and attach snippets for the
    ///    original query
    ///
    /// A page past the end yields an empty list.
    pub fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let start_time = Instant::now();

        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery("query is empty".to_string()));
        }
        if params.page == 0 {
            return Err(SearchError::InvalidQuery("page starts at 1".to_string()));
        }
        if params.per_page == 0 || params.per_page > self.config.max_per_page {
            return Err(SearchError::InvalidQuery(format!(
                "per_page must be between 1 and {}",
                self.config.max_per_page
            )));
        }

        let index = match self.current_index() {
            Some(index) if !index.is_empty() => index,
            _ => return Err(SearchError::NotReady),
        };

        let query_text = if params.expand.unwrap_or(self.config.expand_query) {
            expand_query(query)
        } else {
            query.to_string()
        };

        let wanted = params.page.saturating_mul(params.per_page);
        let candidates = params
            .top_k
            .saturating_mul(params.per_page)
            .saturating_mul(self.config.oversample)
            .max(wanted)
            .min(index.len());

        let hits = index.query(&query_text, candidates)?;

        let mut ranked: Vec<(&IndexEntry, f32)> = hits
            .iter()
            .filter_map(|hit| index.entry(hit.position).map(|entry| (entry, hit.score)))
            .filter(|(entry, _)| match &params.domain {
                Some(domain) => entry.url.contains(domain.as_str()),
                None => true,
            })
            .collect();

        ranked.sort_by(|a, b| {
            let by_score = match params.sort_by {
                SortBy::Score => b.1.total_cmp(&a.1),
                SortBy::Relevance => a.1.total_cmp(&b.1),
            };
            match by_score {
                Ordering::Equal => a.0.url.cmp(&b.0.url),
                other => other,
            }
        });

        let offset = (params.page - 1).saturating_mul(params.per_page);
        let results: Vec<SearchResult> = ranked
            .into_iter()
            .skip(offset)
            .take(params.per_page)
            .map(|(entry, score)| SearchResult {
                url: entry.url.clone(),
                title: entry.title.clone(),
                score,
                snippet: extract_snippet(&entry.cached_text, query, self.config.snippet_window),
            })
            .collect();

        let elapsed = start_time.elapsed().as_secs_f64();
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(query, results.len(), elapsed);

        tracing::debug!(
            "Search '{}' ({}, page {}): {} results in {:.3}s",
            query,
            params.sort_by,
            params.page,
            results.len(),
            elapsed
        );

        Ok(results)
    }
}
