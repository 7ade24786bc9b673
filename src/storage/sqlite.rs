//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CorpusStore trait.

use crate::document::Document;
use crate::search::SearchLog;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CorpusStore, StorageError, StorageResult};
use crate::storage::{DomainCount, RunRecord, RunStatus};
use crate::url::{extract_domain, strip_www};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

const DOCUMENT_COLUMNS: &str = "url, title, description, keywords, content, word_count,
     content_fingerprint, crawled_at";

const RUN_COLUMNS: &str =
    "id, seed_url, started_at, finished_at, config_hash, status, accepted_count, error_message";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn upsert_document(
    conn: &Connection,
    document: &Document,
    run_id: Option<i64>,
) -> StorageResult<()> {
    let domain = Url::parse(&document.url)
        .ok()
        .and_then(|url| extract_domain(&url))
        .map(|host| strip_www(&host).to_string())
        .unwrap_or_default();
    let keywords = serde_json::to_string(&document.keywords)?;

    conn.execute(
        "INSERT INTO documents (url, domain, title, description, keywords, content, word_count,
             content_fingerprint, crawled_at, run_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(url) DO UPDATE SET
             domain = excluded.domain,
             title = excluded.title,
             description = excluded.description,
             keywords = excluded.keywords,
             content = excluded.content,
             word_count = excluded.word_count,
             content_fingerprint = excluded.content_fingerprint,
             crawled_at = excluded.crawled_at,
             run_id = excluded.run_id",
        params![
            document.url,
            domain,
            document.title,
            document.description,
            keywords,
            document.content,
            document.word_count as i64,
            document.content_fingerprint,
            document.crawled_at.to_rfc3339(),
            run_id,
        ],
    )?;
    Ok(())
}

fn conversion_error(
    column: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let keywords: String = row.get(3)?;
    let crawled_at: String = row.get(7)?;

    Ok(Document {
        url: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        keywords: serde_json::from_str(&keywords).map_err(|e| conversion_error(3, e))?,
        content: row.get(4)?,
        word_count: row.get::<_, i64>(5)? as usize,
        content_fingerprint: row.get(6)?,
        crawled_at: parse_timestamp(7, &crawled_at)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        seed_url: row.get(1)?,
        started_at: row.get(2)?,
        finished_at: row.get(3)?,
        config_hash: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Failed),
        accepted: row.get::<_, i64>(6)? as usize,
        error_message: row.get(7)?,
    })
}

impl CorpusStore for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, seed_url: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (seed_url, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![seed_url, now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, accepted: usize) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, accepted_count = ?3 WHERE id = ?4",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                accepted as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, message: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, error_message = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, message, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Documents =====

    fn save_document(&mut self, document: &Document, run_id: Option<i64>) -> StorageResult<()> {
        upsert_document(&self.conn, document, run_id)
    }

    fn save_documents(
        &mut self,
        documents: &[Document],
        run_id: Option<i64>,
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        for document in documents {
            upsert_document(&tx, document, run_id)?;
        }
        tx.commit()?;
        Ok(documents.len())
    }

    fn replace_site_documents(
        &mut self,
        site_prefix: &str,
        documents: &[Document],
        run_id: Option<i64>,
    ) -> StorageResult<usize> {
        let keep: HashSet<&str> = documents.iter().map(|d| d.url.as_str()).collect();
        let tx = self.conn.transaction()?;

        let stale: Vec<String> = {
            let mut stmt = tx.prepare(
                "SELECT url FROM documents WHERE substr(url, 1, length(?1)) = ?1",
            )?;
            let urls = stmt
                .query_map(params![site_prefix], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            urls.into_iter()
                .filter(|url| !keep.contains(url.as_str()))
                .collect()
        };
        for url in &stale {
            tx.execute("DELETE FROM documents WHERE url = ?1", params![url])?;
        }

        for document in documents {
            upsert_document(&tx, document, run_id)?;
        }
        tx.commit()?;

        if !stale.is_empty() {
            tracing::info!("Removed {} vanished documents under {}", stale.len(), site_prefix);
        }
        Ok(documents.len())
    }

    fn load_documents(&self) -> StorageResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM documents ORDER BY id",
            DOCUMENT_COLUMNS
        ))?;
        let documents = stmt
            .query_map([], document_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents)
    }

    fn get_document(&self, url: &str) -> StorageResult<Option<Document>> {
        let document = self
            .conn
            .query_row(
                &format!("SELECT {} FROM documents WHERE url = ?1", DOCUMENT_COLUMNS),
                params![url],
                document_from_row,
            )
            .optional()?;
        Ok(document)
    }

    // ===== Search History =====

    fn record_search(&mut self, log: &SearchLog) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO searches (query, query_key, results, elapsed_secs, searched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                log.query,
                log.query.to_lowercase(),
                log.results as i64,
                log.elapsed_secs,
                log.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn total_searches(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM searches", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn popular_queries(&self, limit: usize) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT query_key, COUNT(*) AS n FROM searches
             GROUP BY query_key ORDER BY n DESC, query_key LIMIT ?1",
        )?;
        let popular = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(popular)
    }

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn total_words(&self) -> StorageResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(word_count), 0) FROM documents",
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }

    fn documents_by_domain(&self) -> StorageResult<Vec<DomainCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, COUNT(*) AS n FROM documents GROUP BY domain ORDER BY n DESC, domain",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(DomainCount {
                    domain: row.get(0)?,
                    documents: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }
}
