//! Koala main entry point
//!
//! This is the command-line interface for the Koala site crawler and corpus
//! search engine.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use koala_search::config::{load_config_with_hash, Config, SiteEntry};
use koala_search::index::{TfIdfVectorizer, VectorIndex, DEFAULT_MAX_FEATURES};
use koala_search::output::{load_statistics, print_statistics};
use koala_search::storage::{export_documents, import_documents, open_storage, CorpusStore};
use koala_search::url::canonicalize_seed;
use koala_search::{Crawler, Document, SearchEngine, SearchParams, SortBy};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Koala: a polite site crawler with ranked corpus search
///
/// Koala crawls configured websites within page and depth budgets while
/// respecting robots.txt, stores the extracted documents, and answers
/// ranked queries over the collected corpus.
#[derive(Parser, Debug)]
#[command(name = "koala")]
#[command(version = "1.0.0")]
#[command(about = "A polite site crawler with ranked corpus search", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "koala.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the configured sites and rebuild the index
    Crawl {
        /// Only crawl the site with this name or seed URL
        #[arg(long)]
        site: Option<String>,
    },

    /// Rebuild the search index from the stored corpus
    Index,

    /// Search the corpus
    Search {
        query: String,

        /// 1-based result page
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page (defaults to the configured value)
        #[arg(long)]
        per_page: Option<usize>,

        /// score (best first) or relevance (ascending score)
        #[arg(long, default_value = "score")]
        sort_by: SortBy,

        /// Keep only results whose URL contains this text
        #[arg(long)]
        domain: Option<String>,

        /// Candidate multiplier applied before filtering
        #[arg(long, default_value_t = 5)]
        top_k: usize,

        /// Disable synonym expansion
        #[arg(long)]
        no_expand: bool,
    },

    /// Export the corpus as JSON
    Export { path: PathBuf },

    /// Import a JSON corpus (document objects or legacy [url, text] pairs)
    Import { path: PathBuf },

    /// Show corpus statistics and exit
    Stats,

    /// Validate the config and show what would be crawled
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    match cli.command {
        Command::Crawl { site } => handle_crawl(&config, &config_hash, site.as_deref()).await,
        Command::Index => handle_index(&config),
        Command::Search {
            query,
            page,
            per_page,
            sort_by,
            domain,
            top_k,
            no_expand,
        } => {
            let params = SearchParams {
                top_k,
                sort_by,
                page,
                per_page: per_page.unwrap_or(config.search.default_per_page),
                domain,
                expand: no_expand.then_some(false),
            };
            handle_search(&config, &query, &params)
        }
        Command::Export { path } => handle_export(&config, &path),
        Command::Import { path } => handle_import(&config, &path),
        Command::Stats => handle_stats(&config),
        Command::Check => handle_check(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("koala_search=info,koala=info,warn"),
            1 => EnvFilter::new("koala_search=debug,koala=debug,info"),
            2 => EnvFilter::new("koala_search=trace,koala=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Crawls each selected site, persisting documents and run records
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    selected: Option<&str>,
) -> anyhow::Result<()> {
    let sites: Vec<&SiteEntry> = config
        .sites
        .iter()
        .filter(|site| selected.map_or(true, |s| site.name == s || site.url == s))
        .collect();

    if sites.is_empty() {
        match selected {
            Some(s) => bail!("no configured site matches '{}'", s),
            None => bail!("no sites configured"),
        }
    }

    let mut storage = open_storage(Path::new(&config.output.database_path))?;

    for site in sites {
        tracing::info!("Crawling {} ({})", site.name, site.url);
        let run_id = storage.create_run(&site.url, config_hash)?;

        let crawler = Crawler::new(site.crawler_config(&config.crawler), &config.user_agent)?;
        match crawler.crawl(&site.url).await {
            Ok(outcome) => {
                let site_prefix = canonicalize_seed(&site.url)
                    .map(|url| url.to_string())
                    .unwrap_or_else(|_| site.url.clone());
                let saved =
                    storage.replace_site_documents(&site_prefix, &outcome.documents, Some(run_id))?;
                storage.complete_run(run_id, outcome.accepted)?;
                println!(
                    "{}: {} accepted, {} rejected, {} failed, {} saved",
                    site.name, outcome.accepted, outcome.rejected, outcome.failed, saved
                );
            }
            Err(e) => {
                tracing::error!("Crawl of {} failed: {}", site.url, e);
                storage.fail_run(run_id, &e.to_string())?;
            }
        }
    }

    let documents = storage.load_documents()?;
    if documents.is_empty() {
        tracing::warn!("Corpus is empty, skipping index build");
        return Ok(());
    }
    let index = build_index(config, &documents)?;
    println!("Index rebuilt over {} documents", index.len());
    Ok(())
}

/// Rebuilds (or reloads) the index for the stored corpus
fn handle_index(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let documents = load_corpus(&storage)?;
    let index = build_index(config, &documents)?;
    println!("Index ready: {} documents", index.len());
    Ok(())
}

/// Runs one query and appends it to the stored search history
fn handle_search(config: &Config, query: &str, params: &SearchParams) -> anyhow::Result<()> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let documents = load_corpus(&storage)?;
    let index = build_index(config, &documents)?;

    let engine = SearchEngine::new(config.search.clone());
    engine.publish(index);

    let results = engine.search(query, params)?;
    if let Some(log) = engine.stats().recent().last() {
        if let Err(e) = storage.record_search(log) {
            tracing::warn!("Failed to record search history: {}", e);
        }
    }
    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    let offset = (params.page - 1) * params.per_page;
    for (i, result) in results.iter().enumerate() {
        let title = if result.title.is_empty() {
            result.url.as_str()
        } else {
            result.title.as_str()
        };
        println!("{}. {} ({:.4})", offset + i + 1, title, result.score);
        println!("   {}", result.url);
        println!("   {}", result.snippet);
        println!();
    }
    Ok(())
}

fn handle_export(config: &Config, path: &Path) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let documents = storage.load_documents()?;
    let written = export_documents(path, &documents)?;
    println!("✓ Exported {} documents to {}", written, path.display());
    Ok(())
}

fn handle_import(config: &Config, path: &Path) -> anyhow::Result<()> {
    let documents = import_documents(path, config.crawler.fingerprint_prefix_chars)
        .with_context(|| format!("failed to import {}", path.display()))?;
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let saved = storage.save_documents(&documents, None)?;
    println!("✓ Imported {} documents from {}", saved, path.display());
    Ok(())
}

/// Handles the stats command: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the check command: validates config and shows what would be crawled
fn handle_check(config: &Config) -> anyhow::Result<()> {
    println!("=== Koala Config Check ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Min word count: {}", config.crawler.min_word_count);
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!("  Domain match: {:?}", config.crawler.domain_match);
    println!("  Strict robots: {}", config.crawler.strict_robots);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nSearch:");
    println!("  Snippet window: {}", config.search.snippet_window);
    println!(
        "  Per page: {} (max {})",
        config.search.default_per_page, config.search.max_per_page
    );
    println!("  Query expansion: {}", config.search.expand_query);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Index cache: {}", config.output.index_cache_path);

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        let limits = site.crawler_config(&config.crawler);
        println!(
            "  - {} <{}> (max pages {}, max depth {})",
            site.name, site.url, limits.max_pages, limits.max_depth
        );
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

fn load_corpus(storage: &dyn CorpusStore) -> anyhow::Result<Vec<Document>> {
    let documents = storage.load_documents()?;
    if documents.is_empty() {
        bail!("corpus is empty; run `koala crawl` or `koala import` first");
    }
    Ok(documents)
}

fn build_index(
    config: &Config,
    documents: &[Document],
) -> anyhow::Result<VectorIndex<TfIdfVectorizer>> {
    let index = VectorIndex::load_or_build(
        Path::new(&config.output.index_cache_path),
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        documents,
    )?;
    Ok(index)
}
