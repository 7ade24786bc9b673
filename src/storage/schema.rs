//! Database schema definitions and migrations
//!
//! This module contains all SQL schema definitions for the Koala Search
//! corpus database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs, one per site crawl
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seed_url TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    accepted_count INTEGER NOT NULL DEFAULT 0,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_runs_seed ON runs(seed_url);

-- The corpus: one row per accepted page, keyed by canonical URL
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    domain TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    keywords TEXT NOT NULL DEFAULT '[]',
    content TEXT NOT NULL,
    word_count INTEGER NOT NULL,
    content_fingerprint TEXT NOT NULL,
    crawled_at TEXT NOT NULL,
    run_id INTEGER REFERENCES runs(id)
);

CREATE INDEX IF NOT EXISTS idx_documents_domain ON documents(domain);
CREATE INDEX IF NOT EXISTS idx_documents_fingerprint ON documents(content_fingerprint);

-- Search history, one row per executed query
CREATE TABLE IF NOT EXISTS searches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query TEXT NOT NULL,
    query_key TEXT NOT NULL,
    results INTEGER NOT NULL,
    elapsed_secs REAL NOT NULL,
    searched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_searches_key ON searches(query_key);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
