//! Vector index over a document corpus
//!
//! Built in one shot from a document list. Entries keep their corpus
//! position, URL, title and cached text, so the retrieval layer can filter
//! and build snippets without going back to storage.

use crate::document::Document;
use crate::index::{IndexError, Vectorizer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// One searchable document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub url: String,
    pub title: String,
    pub vector: Vec<f32>,
    /// Document content, used for snippets
    pub cached_text: String,
}

/// A raw nearest-match hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDocument {
    /// Position of the document in the corpus the index was built from
    pub position: usize,
    /// Cosine similarity; higher is more relevant
    pub score: f32,
}

/// Immutable nearest-match index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex<V> {
    vectorizer: V,
    vectorizer_id: String,
    corpus_key: String,
    entries: Vec<IndexEntry>,
}

impl<V: Vectorizer> VectorIndex<V> {
    /// Fits the vectorizer on the corpus and embeds every document
    ///
    /// Fails on an empty corpus or any vectorizer error; a partially built
    /// index is never returned.
    pub fn build(mut vectorizer: V, documents: &[Document]) -> Result<Self, IndexError> {
        if documents.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        let texts: Vec<String> = documents.iter().map(Document::index_text).collect();
        vectorizer.fit(&texts)?;
        let vectors = vectorizer.embed_batch(&texts)?;

        if vectors.len() != documents.len() {
            return Err(IndexError::Embedding(format!(
                "vectorizer returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let dim = vectorizer.dim();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }

        let entries = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| IndexEntry {
                url: doc.url.clone(),
                title: doc.title.clone(),
                vector,
                cached_text: doc.content.clone(),
            })
            .collect();

        tracing::info!(
            "Built index of {} documents ({} dimensions, vectorizer {})",
            documents.len(),
            dim,
            vectorizer.id()
        );

        Ok(Self {
            vectorizer_id: vectorizer.id(),
            vectorizer,
            corpus_key: corpus_key(documents),
            entries,
        })
    }

    /// Returns the `k` entries most similar to `text`
    ///
    /// Ordered by descending score; equal scores keep corpus order.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredDocument>, IndexError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .vectorizer
            .embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::Embedding("no vector returned for query".to_string()))?;

        let dim = self.vectorizer.dim();
        if query_vector.len() != dim {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                actual: query_vector.len(),
            });
        }

        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| ScoredDocument {
                position,
                score: cosine_similarity(&query_vector, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        scored.truncate(k);
        Ok(scored)
    }

    pub fn entry(&self, position: usize) -> Option<&IndexEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash identifying the corpus this index was built from
    pub fn corpus_key(&self) -> &str {
        &self.corpus_key
    }

    pub fn vectorizer_id(&self) -> &str {
        &self.vectorizer_id
    }
}

impl<V> VectorIndex<V>
where
    V: Vectorizer + Serialize + DeserializeOwned,
{
    /// Writes the index, including the fitted vectorizer, as JSON
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        tracing::debug!("Saved index cache to {}", path.display());
        Ok(())
    }

    /// Reads an index written by [`VectorIndex::save`]
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Reuses the cached index if it matches the corpus, otherwise rebuilds
    ///
    /// A stale, unreadable or missing cache is rebuilt and rewritten. Failing
    /// to write the new cache is logged and does not fail the build.
    pub fn load_or_build(
        path: &Path,
        vectorizer: V,
        documents: &[Document],
    ) -> Result<Self, IndexError> {
        let expected_key = corpus_key(documents);
        let expected_id = vectorizer.id();

        if path.exists() {
            match Self::load(path) {
                Ok(cached)
                    if cached.corpus_key == expected_key && cached.vectorizer_id == expected_id =>
                {
                    tracing::info!(
                        "Loaded cached index of {} documents from {}",
                        cached.len(),
                        path.display()
                    );
                    return Ok(cached);
                }
                Ok(_) => tracing::info!("Index cache at {} is stale, rebuilding", path.display()),
                Err(e) => tracing::warn!(
                    "Index cache at {} unreadable ({}), rebuilding",
                    path.display(),
                    e
                ),
            }
        }

        let index = Self::build(vectorizer, documents)?;
        if let Err(e) = index.save(path) {
            tracing::warn!("Failed to write index cache {}: {}", path.display(), e);
        }
        Ok(index)
    }
}

/// SHA-256 over the URL, title and full content of every document, in order
///
/// Fields are length-prefixed so text cannot shift between them.
pub fn corpus_key(documents: &[Document]) -> String {
    let mut hasher = Sha256::new();
    for doc in documents {
        for field in [&doc.url, &doc.title, &doc.content] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
