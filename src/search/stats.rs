//! In-process search statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// One executed search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchLog {
    pub query: String,
    pub results: usize,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
}

/// Totals reported by [`SearchStats::summary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_searches: u64,
    pub recent_searches: usize,
    pub unique_queries: usize,
}

/// Search counters with a bounded history
#[derive(Debug, Clone)]
pub struct SearchStats {
    total_searches: u64,
    recent: VecDeque<SearchLog>,
    capacity: usize,
    popular: HashMap<String, u64>,
}

impl SearchStats {
    /// Keeps at most `capacity` recent searches
    pub fn new(capacity: usize) -> Self {
        Self {
            total_searches: 0,
            recent: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            popular: HashMap::new(),
        }
    }

    /// Records a search, dropping the oldest history entry when full
    pub fn record(&mut self, query: &str, results: usize, elapsed_secs: f64) {
        self.total_searches += 1;

        if self.capacity > 0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(SearchLog {
                query: query.to_string(),
                results,
                elapsed_secs,
                timestamp: Utc::now(),
            });
        }

        *self.popular.entry(query.to_lowercase()).or_insert(0) += 1;
    }

    pub fn total_searches(&self) -> u64 {
        self.total_searches
    }

    /// Recent searches, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &SearchLog> {
        self.recent.iter()
    }

    /// Most frequent lowercased queries, ties broken alphabetically
    pub fn popular(&self, limit: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .popular
            .iter()
            .map(|(query, count)| (query.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_searches: self.total_searches,
            recent_searches: self.recent.len(),
            unique_queries: self.popular.len(),
        }
    }
}
