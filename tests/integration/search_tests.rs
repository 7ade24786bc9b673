//! Integration tests for indexing and retrieval
//!
//! Covers the crawl -> store -> index -> search pipeline against a mock
//! site, index cache reuse, and the paging and ordering contract of
//! `SearchEngine::search`.

use koala_search::config::{CrawlerConfig, SearchConfig, UserAgentConfig};
use koala_search::crawler::Crawler;
use koala_search::index::{TfIdfVectorizer, VectorIndex, DEFAULT_MAX_FEATURES};
use koala_search::search::SearchError;
use koala_search::storage::{CorpusStore, SqliteStorage};
use koala_search::{Document, SearchEngine, SearchParams, SortBy};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(title: &str, text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">more</a>", href))
        .collect();
    format!(
        "<html><head><title>{}</title>\
         <meta name=\"description\" content=\"About {}\"></head>\
         <body><article><p>{}</p>{}</article></body></html>",
        title, title, text, anchors
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

/// Twelve documents with a decreasing share of the word "rust"
fn ranked_corpus() -> Vec<Document> {
    (0..12)
        .map(|i| {
            let mut text = "rust ".repeat(12 - i);
            text.push_str(&format!("filler{} padding words for document {}", i, i));
            Document::from_legacy(format!("https://site{}.example/doc{}", i % 3, i), text, 500)
        })
        .collect()
}

fn pipeline_crawler() -> Crawler {
    Crawler::new(
        CrawlerConfig {
            max_pages: 10,
            max_depth: 1,
            request_delay_ms: 0,
            min_word_count: 5,
            ..CrawlerConfig::default()
        },
        &UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
    )
    .unwrap()
}

fn engine_over(documents: &[Document]) -> SearchEngine {
    let engine = SearchEngine::new(SearchConfig::default());
    let index = VectorIndex::build(TfIdfVectorizer::new(DEFAULT_MAX_FEATURES), documents)
        .expect("Failed to build index");
    engine.publish(index);
    engine
}

#[tokio::test]
async fn test_crawl_store_index_search_pipeline() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "An overview of this site covering many different programming subjects",
            &["/rust", "/python"],
        ),
    )
    .await;
    mount_html(
        &server,
        "/rust",
        html_page(
            "Rust Ownership",
            "Rust ownership and borrowing rules explained with lifetimes and examples",
            &[],
        ),
    )
    .await;
    mount_html(
        &server,
        "/python",
        html_page(
            "Python Decorators",
            "Python decorators wrap functions to extend behavior without modification",
            &[],
        ),
    )
    .await;

    let crawler = pipeline_crawler();
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();
    assert_eq!(outcome.accepted, 3);

    let temp_dir = TempDir::new().unwrap();
    let mut storage = SqliteStorage::new(&temp_dir.path().join("corpus.db")).unwrap();
    let run_id = storage.create_run(&server.uri(), "hash").unwrap();
    storage.save_documents(&outcome.documents, Some(run_id)).unwrap();
    storage.complete_run(run_id, outcome.accepted).unwrap();

    let documents = storage.load_documents().unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[1].title, "Rust Ownership");
    assert_eq!(documents[1].description, "About Rust Ownership");

    let index = VectorIndex::load_or_build(
        &temp_dir.path().join("index.json"),
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        &documents,
    )
    .unwrap();
    let engine = SearchEngine::new(SearchConfig::default());
    engine.publish(index);

    let results = engine
        .search("borrowing lifetimes", &SearchParams::default())
        .unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].url.ends_with("/rust"));
    assert_eq!(results[0].title, "Rust Ownership");
    assert!(results[0].score > results[1].score);
    assert!(results[0].snippet.contains("borrowing"));

    let results = engine
        .search("decorators", &SearchParams::default())
        .unwrap();
    assert!(results[0].url.ends_with("/python"));

    assert_eq!(engine.stats().total_searches(), 2);
}

#[tokio::test]
async fn test_recrawl_drops_vanished_pages_from_results() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());
    let rust_page = html_page(
        "Rust Ownership",
        "Rust ownership and borrowing rules explained with lifetimes and examples",
        &[],
    );

    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "An overview of this site covering many different programming subjects",
            &["/rust", "/python"],
        ),
    )
    .await;
    mount_html(&server, "/rust", rust_page.clone()).await;
    mount_html(
        &server,
        "/python",
        html_page(
            "Python Decorators",
            "Python decorators wrap functions to extend behavior without modification",
            &[],
        ),
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let mut storage = SqliteStorage::new(&temp_dir.path().join("corpus.db")).unwrap();
    let cache_path = temp_dir.path().join("index.json");

    let first = pipeline_crawler().crawl(&seed).await.unwrap();
    assert_eq!(first.accepted, 3);
    storage.replace_site_documents(&seed, &first.documents, None).unwrap();

    // The site drops its python page
    server.reset().await;
    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "An overview of this site covering many different programming subjects",
            &["/rust"],
        ),
    )
    .await;
    mount_html(&server, "/rust", rust_page).await;

    let second = pipeline_crawler().crawl(&seed).await.unwrap();
    assert_eq!(second.accepted, 2);
    storage.replace_site_documents(&seed, &second.documents, None).unwrap();

    let documents = storage.load_documents().unwrap();
    assert_eq!(documents.len(), 2);
    assert!(documents.iter().all(|doc| !doc.url.ends_with("/python")));

    let index = VectorIndex::load_or_build(
        &cache_path,
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        &documents,
    )
    .unwrap();
    let engine = SearchEngine::new(SearchConfig::default());
    engine.publish(index);

    let results = engine
        .search("decorators", &SearchParams::default())
        .unwrap();
    assert!(results.iter().all(|result| !result.url.ends_with("/python")));
}

#[test]
fn test_cached_index_ranks_like_fresh_build() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("index.json");
    let documents = ranked_corpus();

    let fresh = VectorIndex::load_or_build(
        &cache_path,
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        &documents,
    )
    .unwrap();
    assert!(cache_path.exists());

    let cached = VectorIndex::load_or_build(
        &cache_path,
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        &documents,
    )
    .unwrap();
    assert_eq!(cached.corpus_key(), fresh.corpus_key());

    let a = fresh.query("rust padding", 12).unwrap();
    let b = cached.query("rust padding", 12).unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.position, y.position);
        assert!((x.score - y.score).abs() < 1e-6);
    }
}

#[test]
fn test_changed_corpus_invalidates_cache() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("index.json");
    let mut documents = ranked_corpus();

    let first = VectorIndex::load_or_build(
        &cache_path,
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        &documents,
    )
    .unwrap();

    documents.push(Document::from_legacy(
        "https://site9.example/new",
        "a brand new page about databases",
        500,
    ));
    let second = VectorIndex::load_or_build(
        &cache_path,
        TfIdfVectorizer::new(DEFAULT_MAX_FEATURES),
        &documents,
    )
    .unwrap();

    assert_ne!(first.corpus_key(), second.corpus_key());
    assert_eq!(second.len(), 13);
}

#[test]
fn test_pages_partition_the_ranking() {
    let documents = ranked_corpus();
    let engine = engine_over(&documents);

    let all = engine
        .search(
            "rust",
            &SearchParams {
                per_page: 12,
                ..SearchParams::default()
            },
        )
        .unwrap();
    assert_eq!(all.len(), 12);

    let mut paged = Vec::new();
    for page in 1..=3 {
        let results = engine
            .search(
                "rust",
                &SearchParams {
                    page,
                    per_page: 5,
                    ..SearchParams::default()
                },
            )
            .unwrap();
        assert_eq!(results.len(), if page < 3 { 5 } else { 2 });
        paged.extend(results);
    }
    assert_eq!(paged, all);

    let past_end = engine
        .search(
            "rust",
            &SearchParams {
                page: 4,
                per_page: 5,
                ..SearchParams::default()
            },
        )
        .unwrap();
    assert!(past_end.is_empty());
}

#[test]
fn test_sort_modes_and_domain_filter() {
    let documents = ranked_corpus();
    let engine = engine_over(&documents);

    let params = SearchParams {
        per_page: 12,
        ..SearchParams::default()
    };
    let by_score = engine.search("rust", &params).unwrap();
    assert!(by_score.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(by_score[0].url.ends_with("/doc0"));

    let by_relevance = engine
        .search(
            "rust",
            &SearchParams {
                sort_by: SortBy::Relevance,
                ..params.clone()
            },
        )
        .unwrap();
    assert!(by_relevance.windows(2).all(|w| w[0].score <= w[1].score));
    assert_eq!(by_relevance.last().unwrap().url, by_score[0].url);

    let filtered = engine
        .search(
            "rust",
            &SearchParams {
                domain: Some("site1.example".to_string()),
                ..params
            },
        )
        .unwrap();
    assert_eq!(filtered.len(), 4);
    assert!(filtered.iter().all(|r| r.url.contains("site1.example")));
}

#[test]
fn test_invalid_requests_and_not_ready() {
    let engine: SearchEngine = SearchEngine::new(SearchConfig::default());
    assert!(!engine.is_ready());
    assert!(matches!(
        engine.search("rust", &SearchParams::default()),
        Err(SearchError::NotReady)
    ));

    let engine = engine_over(&ranked_corpus());
    assert!(engine.is_ready());
    assert!(matches!(
        engine.search("   ", &SearchParams::default()),
        Err(SearchError::InvalidQuery(_))
    ));
    assert!(matches!(
        engine.search(
            "rust",
            &SearchParams {
                page: 0,
                ..SearchParams::default()
            }
        ),
        Err(SearchError::InvalidQuery(_))
    ));
    assert!(matches!(
        engine.search(
            "rust",
            &SearchParams {
                per_page: 51,
                ..SearchParams::default()
            }
        ),
        Err(SearchError::InvalidQuery(_))
    ));
}
