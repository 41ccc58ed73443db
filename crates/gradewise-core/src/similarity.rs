//! TF-IDF cosine similarity between two documents.
//!
//! The vocabulary is fit fresh on every call over exactly the documents being
//! compared; nothing is cached between calls.
//!
//! Weighting follows the common smoothed form:
//!
//! ```text
//! tf(t, d)  = raw count of t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then each row is L2-normalized
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Document, SimilarityScore};

/// Words of two or more word characters. Single letters and punctuation are
/// not terms.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Lowercase `text` and split it into terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A TF-IDF vector space fit over a small corpus.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    /// Term to column index, in lexical order.
    vocabulary: BTreeMap<String, usize>,
    /// Smoothed idf per column.
    idf: Vec<f64>,
    /// One L2-normalized row per input document.
    rows: Vec<Vec<f64>>,
}

impl TfIdfModel {
    /// Fit the vocabulary and idf weights over `docs` and vectorize each one.
    pub fn fit_transform(docs: &[&str]) -> Self {
        let counts: Vec<BTreeMap<String, u32>> = docs
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for term in tokenize(doc) {
                    *tf.entry(term).or_insert(0u32) += 1;
                }
                tf
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let vocabulary: BTreeMap<String, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        let n = docs.len() as f64;
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row = vec![0.0f64; vocabulary.len()];
                for (term, &count) in tf {
                    let column = vocabulary[term];
                    row[column] = count as f64 * idf[column];
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Self {
            vocabulary,
            idf,
            rows,
        }
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Idf weight for a term, if it occurs in the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in row.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity between two vectors.
/// Returns 0.0 for mismatched lengths or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Percentage similarity of `candidate` to `reference`.
pub fn score(reference: &Document, candidate: &Document) -> SimilarityScore {
    let model = TfIdfModel::fit_transform(&[reference.text(), candidate.text()]);
    let rows = model.rows();
    let similarity = cosine_similarity(&rows[0], &rows[1]);
    tracing::debug!(
        vocabulary = model.vocabulary().len(),
        similarity,
        "scored candidate against reference"
    );
    SimilarityScore::new(similarity * 100.0)
}
