//! JSON corpus import and export
//!
//! Exports are a JSON array of document objects. Imports also accept the
//! older `[url, text]` pair layout and migrate each pair into a full
//! document on load, so nothing downstream ever sees the legacy shape.

use crate::document::Document;
use crate::storage::traits::{StorageError, StorageResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Accepted shapes of one corpus record
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusRecord {
    Document(Document),
    Legacy(String, String),
}

/// Writes documents as a pretty-printed JSON array
pub fn export_documents(path: &Path, documents: &[Document]) -> StorageResult<usize> {
    let json = serde_json::to_string_pretty(documents)?;
    fs::write(path, json)?;
    tracing::info!("Exported {} documents to {}", documents.len(), path.display());
    Ok(documents.len())
}

/// Reads a JSON corpus file, migrating legacy records
pub fn import_documents(path: &Path, prefix_chars: usize) -> StorageResult<Vec<Document>> {
    let json = fs::read_to_string(path)?;
    let documents = parse_corpus(&json, prefix_chars)?;
    tracing::info!("Read {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Parses a JSON corpus into normalized documents
///
/// Word counts and fingerprints are always recomputed from the content.
/// Any record that is neither a document object nor a `[url, text]` pair
/// fails the whole import with its index.
pub fn parse_corpus(json: &str, prefix_chars: usize) -> StorageResult<Vec<Document>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut documents = Vec::with_capacity(records.len());

    for (index, value) in records.into_iter().enumerate() {
        let record: CorpusRecord =
            serde_json::from_value(value).map_err(|_| StorageError::InvalidRecord {
                index,
                reason: "expected a document object or a [url, text] pair".to_string(),
            })?;

        let document = match record {
            CorpusRecord::Document(doc) => doc.with_derived_fields(prefix_chars),
            CorpusRecord::Legacy(url, text) => Document::from_legacy(url, text, prefix_chars),
        };

        if document.url.trim().is_empty() {
            return Err(StorageError::InvalidRecord {
                index,
                reason: "empty url".to_string(),
            });
        }
        documents.push(document);
    }

    Ok(documents)
}
