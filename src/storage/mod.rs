//! Storage module for persisting the corpus
//!
//! This module handles all persistence for the crawler and the index, including:
//! - SQLite database initialization and schema management
//! - Document upserts keyed by canonical URL
//! - Crawl run tracking
//! - JSON corpus import/export with legacy record migration

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::{export_documents, import_documents, parse_corpus};
pub use sqlite::SqliteStorage;
pub use traits::{CorpusStore, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteStorage::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub seed_url: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub accepted: usize,
    pub error_message: Option<String>,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Number of documents stored for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub documents: u64,
}
