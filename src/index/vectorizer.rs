//! Text vectorization
//!
//! The index never looks inside a vectorizer; it only asks for one vector
//! per text. `TfIdfVectorizer` is the built-in implementation, and anything
//! that turns text into fixed-length `f32` vectors deterministically can be
//! plugged in instead.

use crate::index::IndexError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Turns texts into numeric vectors
///
/// Implementations must be deterministic for a fixed fitted state, since
/// ranking reproducibility across cache reloads depends on it.
pub trait Vectorizer: Send + Sync {
    /// Stable identifier stored alongside cached indexes
    fn id(&self) -> String;

    /// Learns corpus-level state before documents are embedded
    ///
    /// Pretrained models have nothing to learn and keep the default.
    fn fit(&mut self, _corpus: &[String]) -> Result<(), IndexError> {
        Ok(())
    }

    /// Length of every vector produced by `embed_batch`
    fn dim(&self) -> usize;

    /// Embeds each text into a vector of length `dim()`
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError>;
}

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Common English words that carry no ranking signal
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "be", "became", "because", "become", "becomes", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down", "due", "during",
    "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "for", "former", "formerly",
    "from", "further", "had", "has", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hers", "herself", "him", "himself", "his", "how", "however", "ie",
    "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
    "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now", "nowhere",
    "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she", "should",
    "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "them", "themselves", "then",
    "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "this", "those", "though", "through", "throughout", "thru", "thus", "to",
    "together", "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which",
    "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Term-frequency / inverse-document-frequency vectorizer
///
/// - Tokens are lowercased runs of two or more word characters
/// - Stop words are dropped
/// - The vocabulary keeps the `max_features` most frequent corpus terms
/// - `idf = ln((1 + n) / (1 + df)) + 1`
/// - Vectors are L2-normalized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    max_features: usize,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfIdfVectorizer {
    /// Creates an unfitted vectorizer
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Returns true once `fit` has produced a vocabulary
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn id(&self) -> String {
        format!("tfidf-v1-{}", self.max_features)
    }

    fn fit(&mut self, corpus: &[String]) -> Result<(), IndexError> {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for text in corpus {
            let tokens = tokenize(text);
            let mut seen = HashSet::new();
            for token in tokens {
                if seen.insert(token.clone()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
                *term_counts.entry(token).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(IndexError::Embedding(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        // Most frequent terms first, alphabetical among equals
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n = corpus.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                (((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32
            })
            .collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(position, term)| (term, position))
            .collect();

        tracing::debug!(
            "Fitted TF-IDF vocabulary of {} terms over {} documents",
            self.vocabulary.len(),
            corpus.len()
        );
        Ok(())
    }

    fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        if !self.is_fitted() {
            return Err(IndexError::Embedding(
                "TF-IDF vectorizer used before fit".to_string(),
            ));
        }

        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

impl TfIdfVectorizer {
    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&position) = self.vocabulary.get(&token) {
                vector[position] += 1.0;
            }
        }

        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

/// Lowercased word tokens of at least two characters, stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}
