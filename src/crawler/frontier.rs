//! Crawl frontier and visited set
//!
//! The frontier is a FIFO of pending tasks, so a crawl proceeds in
//! breadth-first order by depth. The visited set records every URL the
//! crawl has started processing, whatever the outcome.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    /// Link distance from the seed; the seed is depth 0
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// FIFO queue of pending crawl tasks
///
/// A URL is held at most once while queued.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task; returns false if its URL is already queued
    pub fn push(&mut self, task: CrawlTask) -> bool {
        if !self.queued.insert(task.url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(task);
        true
    }

    /// Removes and returns the oldest task
    pub fn pop(&mut self) -> Option<CrawlTask> {
        let task = self.queue.pop_front()?;
        self.queued.remove(task.url.as_str());
        Some(task)
    }

    /// Returns true if the URL is waiting in the queue
    pub fn contains(&self, url: &Url) -> bool {
        self.queued.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// URLs already taken from the frontier during a run
///
/// Insert-only for the lifetime of the run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns false if it was already marked
    pub fn mark(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
