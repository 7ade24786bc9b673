//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other crawler pieces
//! together for one run over one seed:
//! - Managing the frontier and visited set
//! - Checking robots rules before each fetch
//! - Coordinating fetching, extraction, dedup and link discovery
//! - Enforcing the page, depth and fan-out budgets

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::dedup::DedupIndex;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::{CrawlTask, Frontier, VisitedSet};
use crate::crawler::parser::analyze_page;
use crate::document::{count_words, Document};
use crate::robots::RobotsCache;
use crate::state::{TaskError, TaskState};
use crate::url::{canonicalize_seed, DomainScope};
use crate::KoalaError;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Summary of a finished crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Accepted documents in acceptance order
    pub documents: Vec<Document>,

    /// Distinct URLs taken from the frontier
    pub visited: usize,

    /// Tasks still queued when the run stopped
    pub frontier_remaining: usize,

    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Crawl engine context
///
/// Holds what is shared across runs (HTTP client and policy values). All
/// per-run state is created fresh by [`Crawler::crawl`].
#[derive(Debug, Clone)]
pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
}

/// State owned by a single crawl run
struct CrawlRun {
    scope: DomainScope,
    frontier: Frontier,
    visited: VisitedSet,
    dedup: DedupIndex,
    robots: RobotsCache,
    outcome: CrawlOutcome,
}

impl Crawler {
    /// Creates a crawler with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - Budgets and politeness settings
    /// * `user_agent` - Identification sent with every request
    pub fn new(config: CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, KoalaError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = build_http_client(user_agent, timeout)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a crawler around an existing client
    pub fn with_client(client: Client, config: CrawlerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Runs one bounded breadth-first crawl from `seed`
    ///
    /// # Loop
    ///
    /// While the frontier is non-empty and fewer than `max-pages` documents
    /// have been accepted:
    ///
    /// 1. Pop a task; discard it if already visited or deeper than `max-depth`
    /// 2. Mark it visited
    /// 3. Check robots rules for its domain
    /// 4. Fetch; non-2xx or non-HTML responses are rejected
    /// 5. Extract content; short pages are rejected
    /// 6. Reject duplicate content
    /// 7. Accept the document
    /// 8. If the body was fetched and the task is above `max-depth`, enqueue
    ///    up to `max-links-per-page` new links at depth + 1
    /// 9. Sleep for `request-delay-ms`
    ///
    /// Per-task failures are logged and counted; only an invalid seed makes
    /// this return an error.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome, KoalaError> {
        let seed_url = canonicalize_seed(seed)?;
        let scope = DomainScope::from_seed(&seed_url, self.config.domain_match)?;

        let mut run = CrawlRun {
            scope,
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            dedup: DedupIndex::new(self.config.fingerprint_prefix_chars),
            robots: RobotsCache::new(self.config.strict_robots),
            outcome: CrawlOutcome::default(),
        };
        run.frontier.push(CrawlTask::new(seed_url.clone(), 0));

        tracing::info!(
            "Starting crawl of {} (max pages {}, max depth {})",
            seed_url,
            self.config.max_pages,
            self.config.max_depth
        );
        let start_time = Instant::now();
        let delay = Duration::from_millis(self.config.request_delay_ms);

        while run.outcome.accepted < self.config.max_pages {
            let Some(task) = run.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if run.visited.contains(&task.url) || task.depth > self.config.max_depth {
                tracing::trace!("Discarding {} at depth {}", task.url, task.depth);
                run.outcome.rejected += 1;
                continue;
            }
            run.visited.mark(&task.url);

            tracing::debug!(
                "{} {} (depth {})",
                TaskState::Fetching,
                task.url,
                task.depth
            );

            match self.process_task(&mut run, &task).await {
                Ok(document) => {
                    run.outcome.accepted += 1;
                    tracing::info!(
                        "[{}/{}] Accepted: {}",
                        run.outcome.accepted,
                        self.config.max_pages,
                        document.url
                    );
                    run.outcome.documents.push(document);
                }
                Err(error) => match error.state() {
                    TaskState::Failed => {
                        run.outcome.failed += 1;
                        tracing::warn!("{}", error);
                    }
                    _ => {
                        run.outcome.rejected += 1;
                        tracing::debug!("Rejected: {}", error);
                    }
                },
            }

            if run.outcome.accepted < self.config.max_pages
                && !run.frontier.is_empty()
                && !delay.is_zero()
            {
                tokio::time::sleep(delay).await;
            }
        }

        run.outcome.visited = run.visited.len();
        run.outcome.frontier_remaining = run.frontier.len();

        tracing::info!(
            "Crawl of {} finished in {:?}: {} accepted, {} rejected, {} failed, {} left in frontier",
            seed_url,
            start_time.elapsed(),
            run.outcome.accepted,
            run.outcome.rejected,
            run.outcome.failed,
            run.outcome.frontier_remaining
        );

        Ok(run.outcome)
    }

    /// Processes a single task, enqueueing its links as a side effect
    async fn process_task(&self, run: &mut CrawlRun, task: &CrawlTask) -> Result<Document, TaskError> {
        let url_str = task.url.as_str();

        if !run.robots.rules_for(&self.client, &task.url).await.is_allowed(&task.url) {
            return Err(TaskError::RobotsDisallowed {
                url: url_str.to_string(),
            });
        }

        let (final_url, body) = match fetch_url(&self.client, url_str).await {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            FetchResult::UnsupportedContent { content_type } => {
                return Err(TaskError::UnsupportedContent {
                    url: url_str.to_string(),
                    content_type,
                });
            }
            FetchResult::HttpError { status_code } => {
                return Err(TaskError::HttpStatus {
                    url: url_str.to_string(),
                    status: status_code,
                });
            }
            FetchResult::NetworkError { error } => {
                return Err(TaskError::Network {
                    url: url_str.to_string(),
                    message: error,
                });
            }
        };

        // Relative links resolve against where the page actually lives
        let page_url = Url::parse(&final_url).unwrap_or_else(|_| task.url.clone());
        let page = analyze_page(&body, &page_url, &run.scope);

        if task.depth < self.config.max_depth {
            self.enqueue_links(run, page.links, task.depth + 1);
        }

        let content = page.extracted.content;
        let words = count_words(&content);
        if words < self.config.min_word_count {
            return Err(TaskError::ContentTooShort {
                url: url_str.to_string(),
                words,
            });
        }

        if run.dedup.check_and_register(&content).is_none() {
            return Err(TaskError::DuplicateContent {
                url: url_str.to_string(),
            });
        }

        Ok(Document::new(
            url_str,
            page.extracted.metadata,
            content,
            self.config.fingerprint_prefix_chars,
        ))
    }

    /// Enqueues up to the fan-out cap of links not yet visited or queued
    fn enqueue_links(&self, run: &mut CrawlRun, links: Vec<Url>, depth: u32) {
        let mut added = 0;
        for link in links {
            if added >= self.config.max_links_per_page {
                break;
            }
            if run.visited.contains(&link) || run.frontier.contains(&link) {
                continue;
            }
            if run.frontier.push(CrawlTask::new(link, depth)) {
                added += 1;
            }
        }

        if added > 0 {
            tracing::debug!("Enqueued {} links at depth {}", added, depth);
        }
    }
}
