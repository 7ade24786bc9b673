//! Vector index module
//!
//! # Components
//!
//! - `Vectorizer`: the seam to whatever turns text into vectors
//! - `TfIdfVectorizer`: built-in term-weighting vectorizer
//! - `VectorIndex`: build, query and JSON cache persistence

mod vector_index;
mod vectorizer;

pub use vector_index::{corpus_key, cosine_similarity, IndexEntry, ScoredDocument, VectorIndex};
pub use vectorizer::{tokenize, TfIdfVectorizer, Vectorizer, DEFAULT_MAX_FEATURES};

use thiserror::Error;

/// Errors raised while building, querying or caching an index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Vectorization failed: {0}")]
    Embedding(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    #[error("Index cache format error: {0}")]
    CacheFormat(#[from] serde_json::Error),
}
